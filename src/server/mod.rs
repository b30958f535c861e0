// =====================================================
// FILE: src/server/mod.rs - ACTIX-WEB SERVER MODULE
// =====================================================

pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod render;
pub mod routes;

pub use extract::CurrentActor;
pub use middleware::RequestLogger;

use crate::auth::{AuthProvider, FirebaseAuth, LocalAuth, SessionStore};
use crate::core::config::{AuthConfig, AuthProviderKind, StoreBackend, StoreConfig};
use crate::core::prelude::*;
use crate::store::{DocumentStore, FirestoreStore, MemoryStore, OfflineStore};
use actix_cors::Cors;
use actix_web::{middleware::Condition, web, App, HttpServer};
use std::sync::Arc;

const MAX_SESSION_TTL_MINUTES: u64 = 60 * 24 * 365;

/// Everything a handler needs, shared across workers through `web::Data`.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn DocumentStore>,
    pub auth: Arc<dyn AuthProvider>,
    pub sessions: SessionStore,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn DocumentStore>, auth: Arc<dyn AuthProvider>) -> Self {
        Self {
            store,
            auth,
            sessions: SessionStore::with_ttl(chrono::Duration::minutes(
                config.auth.session_ttl_minutes.min(MAX_SESSION_TTL_MINUTES) as i64,
            )),
            started_at: Instant::now(),
            config,
        }
    }
}

pub async fn build_state(config: &Config) -> Result<AppState> {
    let store = open_store(&config.store).await?;
    let auth = auth_provider(&config.auth)?;
    log::info!(
        "Content store: {}, auth provider: {}",
        store.name(),
        auth.name()
    );
    Ok(AppState::new(config.clone(), store, auth))
}

async fn open_store(config: &StoreConfig) -> Result<Arc<dyn DocumentStore>> {
    let store: Arc<dyn DocumentStore> = match config.backend {
        StoreBackend::Memory => match &config.data_file {
            Some(path) => Arc::new(MemoryStore::open(path).await?),
            None => Arc::new(MemoryStore::new()),
        },
        StoreBackend::Firestore => match FirestoreStore::new(config) {
            Ok(store) => Arc::new(store),
            Err(e) => {
                log::warn!("Firestore is not usable ({}); serving example data", e);
                Arc::new(OfflineStore::new(e.to_string()))
            }
        },
        StoreBackend::Offline => {
            log::warn!("Store backend is offline; every section will show example data");
            Arc::new(OfflineStore::default())
        }
    };
    Ok(store)
}

fn auth_provider(config: &AuthConfig) -> Result<Arc<dyn AuthProvider>> {
    let provider: Arc<dyn AuthProvider> = match config.provider {
        AuthProviderKind::Local => Arc::new(LocalAuth::new(
            config.accounts.clone(),
            config.salt.clone(),
        )),
        AuthProviderKind::Firebase => Arc::new(FirebaseAuth::new(config.api_key.clone())?),
    };
    Ok(provider)
}

pub async fn run(config: Config) -> Result<()> {
    let state = web::Data::new(build_state(&config).await?);
    let (host, port) = config.bind_address();
    let static_dir = config.server.static_dir.clone();
    let enable_cors = config.server.enable_cors;

    if let Some(dir) = &static_dir {
        log::info!("Serving static files from {}", dir.display());
    }

    let server = HttpServer::new(move || {
        let static_dir = static_dir.clone();
        App::new()
            .app_data(state.clone())
            .wrap(Condition::new(enable_cors, Cors::permissive()))
            .wrap(RequestLogger)
            .configure(move |cfg| routes::configure(cfg, static_dir.as_deref()))
    })
    .workers(config.server.workers.max(1))
    .shutdown_timeout(config.server.shutdown_timeout)
    .bind((host.as_str(), port))
    .map_err(AppError::Io)?;

    log::info!("Listening on http://{}:{}", host, port);
    server.run().await.map_err(AppError::Io)?;
    log::info!("Server stopped");
    Ok(())
}
