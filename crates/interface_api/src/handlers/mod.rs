//! Request handlers

pub mod health;
pub mod loads;
pub mod receipts;
pub mod uploads;
