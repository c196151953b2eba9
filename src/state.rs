use std::{sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::auth::jwt::TokenCodec;
use crate::config::{AppConfig, JwtConfig};
use crate::users::{MemoryUserStore, PgUserStore, UserStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub codec: TokenCodec,
    pub store: Arc<dyn UserStore>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let store = match &config.database_url {
            Some(url) => {
                let db = PgPoolOptions::new()
                    .max_connections(config.max_connections)
                    .acquire_timeout(Duration::from_secs(5))
                    .connect(url)
                    .await
                    .context("connect to database")?;

                // Run migrations if present
                if let Err(e) = sqlx::migrate!("./migrations").run(&db).await {
                    tracing::warn!(error = %e, "migration failed; continuing");
                }

                Arc::new(PgUserStore::new(db)) as Arc<dyn UserStore>
            }
            None => {
                tracing::warn!("DATABASE_URL not set; users are kept in memory");
                Arc::new(MemoryUserStore::new()) as Arc<dyn UserStore>
            }
        };

        Ok(Self::from_parts(config, store))
    }

    pub fn from_parts(config: Arc<AppConfig>, store: Arc<dyn UserStore>) -> Self {
        let codec = TokenCodec::from_config(&config.jwt);
        Self {
            config,
            codec,
            store,
        }
    }

    /// In-memory state with a fixed test secret.
    pub fn fake() -> Self {
        let config = Arc::new(AppConfig {
            database_url: None,
            max_connections: 1,
            host: "127.0.0.1".into(),
            port: 0,
            jwt: JwtConfig {
                secret: "test".into(),
                ttl_minutes: 5,
            },
        });
        Self::from_parts(config, Arc::new(MemoryUserStore::new()))
    }
}
