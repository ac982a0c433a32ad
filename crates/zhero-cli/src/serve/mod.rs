//! Admin and public JSON servers.
//!
//! Both servers share one resolver, one class hierarchy and one content
//! manager. The admin server exposes vocabulary browsing and schema/page
//! editing; the public server only renders enabled pages as JSON-LD.
//!
//! # Module Structure
//!
//! - `handlers` - HTTP route handlers
//! - `models` - API request/response types (DTOs)

mod handlers;
mod models;

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};

use zhero_core::{Config, ContentManager, FileStorage, HierarchyBuilder, Resolver};

// =============================================================================
// Application State
// =============================================================================

/// Shared application state for both servers.
pub struct AppState {
    /// Vocabulary resolver.
    pub resolver: Arc<Resolver>,
    /// Class hierarchy, built on first request.
    pub hierarchy: HierarchyBuilder,
    /// Schema and page store.
    pub manager: RwLock<ContentManager<FileStorage>>,
}

impl AppState {
    pub fn new(resolver: Arc<Resolver>, storage: FileStorage) -> Self {
        Self {
            hierarchy: HierarchyBuilder::new(Arc::clone(&resolver)),
            manager: RwLock::new(ContentManager::new(storage, Arc::clone(&resolver))),
            resolver,
        }
    }
}

// =============================================================================
// Routers
// =============================================================================

/// Routes of the admin server.
pub fn admin_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Vocabulary
        .route("/api/classes", get(handlers::list_classes))
        .route("/api/classes/{name}", get(handlers::get_class))
        .route("/api/classes/{name}/subclasses", get(handlers::list_subclasses))
        .route("/api/hierarchy", get(handlers::class_hierarchy))
        // Schemas
        .route(
            "/api/schemas",
            get(handlers::list_schemas).post(handlers::save_schema),
        )
        .route(
            "/api/schemas/{name}",
            get(handlers::get_schema).delete(handlers::delete_schema),
        )
        // Pages
        .route(
            "/api/pages/{schema}",
            get(handlers::list_pages).post(handlers::create_page),
        )
        .route(
            "/api/pages/{schema}/{id}",
            get(handlers::get_page)
                .put(handlers::update_page)
                .delete(handlers::delete_page),
        )
        .route("/api/pages/{schema}/{id}/enable", post(handlers::enable_page))
        .route("/api/pages/{schema}/{id}/disable", post(handlers::disable_page))
        // CORS for the admin frontend
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .with_state(state)
}

/// Routes of the public server.
pub fn public_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/{schema}/{id}", get(handlers::published_page))
        .with_state(state)
}

// =============================================================================
// Server Entry Point
// =============================================================================

/// Start the admin and public servers and run until Ctrl+C.
pub async fn start_servers(config: &Config, resolver: Arc<Resolver>) -> std::io::Result<()> {
    let storage = FileStorage::with_config(&config.storage);
    let state = Arc::new(AppState::new(resolver, storage));

    let admin_addr = SocketAddr::from(([127, 0, 0, 1], config.admin.port));
    let public_addr = SocketAddr::from(([0, 0, 0, 0], config.public.port));

    let admin_listener = tokio::net::TcpListener::bind(admin_addr).await?;
    let public_listener = tokio::net::TcpListener::bind(public_addr).await?;

    tracing::info!(%admin_addr, "admin server listening");
    tracing::info!(%public_addr, "public server listening");
    println!("Admin:  http://localhost:{}", config.admin.port);
    println!("Public: http://localhost:{}", config.public.port);
    println!("Press Ctrl+C to stop\n");

    let admin = axum::serve(admin_listener, admin_router(Arc::clone(&state)))
        .with_graceful_shutdown(shutdown_signal());
    let public = axum::serve(public_listener, public_router(state))
        .with_graceful_shutdown(shutdown_signal());

    tokio::try_join!(admin.into_future(), public.into_future())?;

    tracing::info!("servers stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl+C");
    }
}
