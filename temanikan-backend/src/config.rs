use std::env;

use crate::ai::ApiKeyPool;

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    /// Gemini API keys, loaded once at startup and passed explicitly into
    /// the orchestrator.
    pub api_keys: ApiKeyPool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .expect("PORT must be a valid number"),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "./.db/temanikan.db".to_string()),
            api_keys: ApiKeyPool::from_env(),
        }
    }
}
