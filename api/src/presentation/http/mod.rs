pub mod auth;
pub mod contacts;
pub mod error;
pub mod extractors;
pub mod health;

use axum::Router;
use tower_http::services::ServeDir;

use crate::bootstrap::app_context::AppContext;
use crate::bootstrap::config::StorageBackend;

/// Contacts and auth routes under `/api`, plus locally stored avatars when the
/// filesystem backend is active.
pub fn router(ctx: AppContext) -> anyhow::Result<Router> {
    let mut api = Router::new()
        .merge(contacts::routes(ctx.clone())?)
        .merge(auth::routes(ctx.clone()));
    if ctx.cfg.storage_backend == StorageBackend::Filesystem {
        api = api.nest_service("/uploads", ServeDir::new(&ctx.cfg.storage_root));
    }
    Ok(Router::new().nest("/api", api))
}
