use std::sync::Arc;

use sqlx::SqlitePool;

use super::{auth::Jwt, config::Config, db};

pub struct AppState {
    pub config: Config,
    pub db: SqlitePool,
    pub jwt: Jwt,
}

impl AppState {
    pub async fn new() -> Arc<Self> {
        let config = Config::load();

        let db = db::connect(&config.database_url, 5)
            .await
            .expect("Database misconfigured!");
        let jwt = Jwt::new(&config.jwt_secret);

        Arc::new(Self { config, db, jwt })
    }
}
