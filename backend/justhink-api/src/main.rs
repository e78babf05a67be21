use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use fcm_shared::FCMClient;
use justhink_api::db::Database;
use justhink_api::routes::configure_routes;
use justhink_api::services::{NoopPushSender, ObjectStore, PushSender};
use justhink_api::{AppState, Config};
use s3_utils::S3Client;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info".into());
    let json = std::env::var("LOG_FORMAT")
        .map(|f| f.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!("SIGTERM handler unavailable ({e}); waiting for Ctrl+C only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

async fn build_push_sender(config: &Config) -> anyhow::Result<Arc<dyn PushSender>> {
    if !config.push.enabled {
        tracing::info!("Push notifications disabled");
        return Ok(Arc::new(NoopPushSender));
    }

    let client = FCMClient::from_credentials_file(&config.push.credentials_file)
        .await
        .with_context(|| {
            format!(
                "failed to initialize FCM from {}",
                config.push.credentials_file
            )
        })?;
    tracing::info!(project_id = %client.project_id(), "FCM client initialized");

    Ok(Arc::new(client))
}

/// Justhink API
///
/// REST backend for the Justhink social app.
///
/// # Routes
///
/// - `/auth/login` - Bearer token issuance
/// - `/users/*` - Profiles, registration, follow graph
/// - `/posts/*` - Posts, feeds, upvotes
/// - `/comments/*` - Comments and replies
/// - `/communities/*` - Communities and membership
/// - `/search/content/{query}` - Combined search
/// - `/notification/*` - Notification list and manual sends
/// - `/upload/` - Image upload
/// - `/health` - Database ping
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting justhink-api v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let db = match Database::connect(&config.database).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Database connection failed: {}", e);
            eprintln!("ERROR: Failed to connect to MongoDB: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!(database = %config.database.name, "Connected to MongoDB");

    if let Err(e) = db.ensure_indexes().await {
        tracing::warn!("Index creation failed: {}", e);
    }

    let push = match build_push_sender(&config).await {
        Ok(push) => push,
        Err(e) => {
            tracing::error!("Push provider initialization failed: {:#}", e);
            eprintln!("ERROR: Failed to initialize push provider: {:#}", e);
            std::process::exit(1);
        }
    };

    let s3 = S3Client::with_config(config.storage.clone()).await;
    let store: Arc<dyn ObjectStore> = Arc::new(s3.operations());

    let state = AppState::new(db, &config, push.clone(), store);
    let keys = state.jwt.clone();
    let state = web::Data::new(state);

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    let allowed_origins = config.cors.allowed_origins.clone();
    let server = HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else if !origin.is_empty() {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        let keys = keys.clone();
        App::new()
            .app_data(state.clone())
            .wrap(actix_middleware::Logging)
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(move |cfg| configure_routes(cfg, keys))
    })
    .bind(&bind_address)
    .with_context(|| format!("failed to bind {bind_address}"))?
    .disable_signals()
    .run();

    let server_handle = server.handle();
    let mut server_task = tokio::spawn(async move {
        tracing::info!("HTTP server is running");
        server.await
    });

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    tokio::select! {
        result = &mut server_task => {
            match result {
                Ok(Ok(())) => tracing::info!("HTTP server stopped"),
                Ok(Err(e)) => tracing::error!("HTTP server error: {}", e),
                Err(e) => tracing::error!("HTTP server task failed: {}", e),
            }
        }
        _ = &mut shutdown => {
            tracing::info!("Shutdown signal received, stopping HTTP server");
            server_handle.stop(true).await;
            if let Err(e) = server_task.await {
                tracing::error!("HTTP server task failed: {}", e);
            }
        }
    }

    push.shutdown().await;
    tracing::info!("justhink-api stopped");
    Ok(())
}
