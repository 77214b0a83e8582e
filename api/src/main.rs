use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::extract::MatchedPath;
use dotenvy::dotenv;
use http::HeaderValue;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use contacts_api::application::ports::avatar_storage::AvatarStorage;
use contacts_api::application::ports::user_cache::UserCache;
use contacts_api::bootstrap::app_context::{AppContext, AppServices};
use contacts_api::bootstrap::config::{Config, StorageBackend};
use contacts_api::infrastructure::cache::{NoopUserCache, RedisUserCache};
use contacts_api::infrastructure::db::repositories::contact_repository_sqlx::SqlxContactRepository;
use contacts_api::infrastructure::email::LogEmailSender;
use contacts_api::infrastructure::storage::{fs::FsAvatarStorage, s3::S3AvatarStorage};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
        paths(
            contacts_api::presentation::http::contacts::list_contacts,
            contacts_api::presentation::http::contacts::search_contacts,
            contacts_api::presentation::http::contacts::soon_celebrate,
            contacts_api::presentation::http::contacts::signup,
            contacts_api::presentation::http::contacts::me,
            contacts_api::presentation::http::contacts::reset_password,
            contacts_api::presentation::http::contacts::get_contact,
            contacts_api::presentation::http::contacts::update_contact,
            contacts_api::presentation::http::contacts::delete_contact,
            contacts_api::presentation::http::contacts::update_avatar,
            contacts_api::presentation::http::auth::login,
            contacts_api::presentation::http::auth::verify,
            contacts_api::presentation::http::auth::set_password,
            contacts_api::presentation::http::health::health,
        ),
        components(schemas(
            contacts_api::domain::contacts::contact::UserRole,
            contacts_api::presentation::http::contacts::ContactResponse,
            contacts_api::presentation::http::contacts::ContactCreateRequest,
            contacts_api::presentation::http::contacts::ContactUpdateRequest,
            contacts_api::presentation::http::contacts::AvatarMultipart,
            contacts_api::presentation::http::auth::LoginRequest,
            contacts_api::presentation::http::auth::TokenResponse,
            contacts_api::presentation::http::auth::PasswordSetRequest,
            contacts_api::presentation::http::error::ErrorDetail,
            contacts_api::presentation::http::error::RateLimited,
            contacts_api::presentation::http::health::HealthResp,
        )),
        tags(
            (name = "Contacts", description = "Contacts management"),
            (name = "Auth", description = "Login, email verification and password reset"),
            (name = "Health", description = "System health checks")
        )
    )]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "contacts_api=debug,axum=info,tower_http=info".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    info!(?cfg, "Starting contacts backend");

    // Database
    let pool = contacts_api::infrastructure::db::connect_pool(&cfg.database_url).await?;
    contacts_api::infrastructure::db::migrate(&pool).await?;

    let contact_repo = Arc::new(SqlxContactRepository::new(pool.clone()));

    let user_cache: Arc<dyn UserCache> = match cfg.redis_url.as_deref() {
        Some(url) => Arc::new(RedisUserCache::connect(url, cfg.cache_ttl_secs).await?),
        None => {
            info!("REDIS_URL not set; profile cache disabled");
            Arc::new(NoopUserCache)
        }
    };

    let avatar_storage: Arc<dyn AvatarStorage> = match cfg.storage_backend {
        StorageBackend::Filesystem => {
            // Ensure uploads dir exists
            if let Err(e) = tokio::fs::create_dir_all(&cfg.storage_root).await {
                tracing::warn!(error=?e, dir=%cfg.storage_root, "Failed to create uploads dir");
            }
            Arc::new(FsAvatarStorage::new(
                &cfg.storage_root,
                cfg.public_base_url.clone(),
            ))
        }
        StorageBackend::S3 => Arc::new(S3AvatarStorage::new(&cfg).await?),
    };

    let email_sender = Arc::new(LogEmailSender::new(
        cfg.mail_from.clone(),
        cfg.mail_from_name.clone(),
    ));

    let services = AppServices::new(contact_repo, user_cache, avatar_storage, email_sender);
    let ctx = AppContext::new(cfg.clone(), services);

    // Build CORS
    let methods = [
        http::Method::GET,
        http::Method::POST,
        http::Method::PUT,
        http::Method::DELETE,
        http::Method::PATCH,
        http::Method::OPTIONS,
    ];
    let headers = [http::header::CONTENT_TYPE, http::header::AUTHORIZATION];
    let cors = match cfg
        .frontend_url
        .as_deref()
        .map(HeaderValue::from_str)
    {
        Some(Ok(origin)) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(methods)
            .allow_headers(headers)
            .allow_credentials(true),
        _ if cfg.is_production => CorsLayer::new()
            .allow_origin(AllowOrigin::exact(HeaderValue::from_static("http://invalid")))
            .allow_methods(methods)
            .allow_headers(headers),
        _ => CorsLayer::new()
            .allow_origin(AllowOrigin::mirror_request())
            .allow_methods(methods)
            .allow_headers(headers)
            .allow_credentials(true),
    };

    let app = contacts_api::presentation::http::router(ctx)?
        .nest("/api", contacts_api::presentation::http::health::routes(pool.clone()))
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(DefaultBodyLimit::max(cfg.upload_max_bytes))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let matched = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                tracing::info_span!("http", %method, %uri, matched_path = %matched)
            }),
        );

    let api_addr = SocketAddr::from(([0, 0, 0, 0], cfg.api_port));
    info!(%api_addr, "HTTP API listening");
    let listener = tokio::net::TcpListener::bind(api_addr).await?;
    // Peer addresses back the rate limiter when no forwarding header is present.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("HTTP API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = ?e, "failed to listen for shutdown signal");
    }
}
