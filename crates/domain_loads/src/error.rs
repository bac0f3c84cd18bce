//! Load domain errors

use thiserror::Error;

use core_kernel::{LoadId, PortError};

/// Errors that can occur in the load domain
#[derive(Debug, Error)]
pub enum LoadError {
    /// Load with the given ID was not found
    #[error("Load not found: {0}")]
    LoadNotFound(LoadId),

    /// One or more load fields failed validation
    #[error("Invalid load data: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// The record store failed
    #[error("Record store error: {0}")]
    Storage(#[from] PortError),
}

impl LoadError {
    /// Creates a single-message validation error
    pub fn invalid(message: impl Into<String>) -> Self {
        LoadError::Validation(vec![message.into()])
    }

    /// Maps a port error for `id`, turning NotFound into `LoadNotFound`
    pub fn from_port(id: LoadId, error: PortError) -> Self {
        if error.is_not_found() {
            LoadError::LoadNotFound(id)
        } else {
            LoadError::Storage(error)
        }
    }
}
