//! HTTP API Layer
//!
//! REST surface for loads, receipts, uploads and downloads, built on Axum.
//!
//! # Architecture
//!
//! - **Handlers**: one module per resource, thin wrappers over the domain services
//! - **Middleware**: request ids, tracing, CORS, audit logging
//! - **DTOs**: camelCase request/response bodies
//! - **Error Handling**: domain errors mapped to status codes in [`error`]
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let ports = Ports { loads, ledger, blobs };
//! let state = AppState::new(config, ports)?;
//! axum::serve(listener, create_router(state)).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
    middleware as axum_middleware,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use core_kernel::{CoreError, Timezone};
use domain_loads::{LoadService, LoadStorePort};
use domain_receipts::{
    BlobStorePort, LifecycleObserver, ReceiptLedgerPort, ReceiptLifecycleCoordinator,
    ReceiptRegistry, TracingObserver, UploadService,
};

use crate::config::ApiConfig;
use crate::handlers::{health, loads, receipts, uploads};
use crate::middleware::audit_middleware;

/// The external stores the services run against
#[derive(Clone)]
pub struct Ports {
    pub loads: Arc<dyn LoadStorePort>,
    pub ledger: Arc<dyn ReceiptLedgerPort>,
    pub blobs: Arc<dyn BlobStorePort>,
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub ports: Ports,
    pub loads: LoadService,
    pub registry: ReceiptRegistry,
    pub lifecycle: ReceiptLifecycleCoordinator,
    pub uploads: UploadService,
}

impl AppState {
    /// Wires the services over the given ports, reporting lifecycle
    /// failures through [`TracingObserver`]
    ///
    /// # Errors
    ///
    /// `CoreError::Configuration` if the business timezone is unknown.
    pub fn new(config: ApiConfig, ports: Ports) -> Result<Self, CoreError> {
        Self::with_observer(config, ports, Arc::new(TracingObserver))
    }

    pub fn with_observer(
        config: ApiConfig,
        ports: Ports,
        observer: Arc<dyn LifecycleObserver>,
    ) -> Result<Self, CoreError> {
        let timezone: Timezone = config.business_timezone.parse()?;
        Ok(Self {
            loads: LoadService::new(ports.loads.clone(), timezone),
            registry: ReceiptRegistry::new(ports.loads.clone(), ports.ledger.clone()),
            lifecycle: ReceiptLifecycleCoordinator::new(
                ports.loads.clone(),
                ports.ledger.clone(),
                ports.blobs.clone(),
            )
            .with_observer(observer.clone()),
            uploads: UploadService::new(ports.blobs.clone()).with_observer(observer),
            config,
            ports,
        })
    }
}

/// Creates the main API router
pub fn create_router(state: AppState) -> Router {
    // Public routes
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let load_routes = Router::new()
        .route("/", post(loads::create_load).get(loads::list_loads))
        .route("/today", get(loads::list_today))
        .route(
            "/:id",
            get(loads::get_load).put(loads::update_load).delete(loads::delete_load),
        )
        .route("/:id/receipt", post(loads::attach_receipt));

    let receipt_routes = Router::new()
        .route("/", get(receipts::list_receipts).post(receipts::save_standalone_receipt))
        .route("/new", get(receipts::new_load_receipts))
        .route("/standalone/:id", axum::routing::delete(receipts::delete_standalone_receipt))
        .route("/:reference", axum::routing::delete(receipts::delete_by_reference));

    let api_routes = Router::new()
        .nest("/loads", load_routes)
        .nest("/receipts", receipt_routes)
        .route("/uploads", post(uploads::issue_upload_target))
        .route("/downloads", post(uploads::issue_download_url))
        .layer(axum_middleware::from_fn(audit_middleware));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
