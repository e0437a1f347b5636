use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server_port: u16,
    pub database_url: String,
    pub redis_url: String,
    pub api_key: String,
    pub webhook_url: String,
    pub webhook_retry_attempts: u32,
    pub webhook_retry_delay_secs: u64,
    pub webhook_timeout_secs: u64,
    pub stats_window_minutes: i64,
    pub log_level: String,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080);

        let db_host = env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string());
        let db_port = env::var("DB_PORT").unwrap_or_else(|_| "5432".to_string());
        let db_name = env::var("DB_DATABASE").unwrap_or_else(|_| "geo_alert".to_string());
        let db_user = env::var("DB_USER").unwrap_or_else(|_| "postgres".to_string());
        let db_pwd = env::var("DB_PWD").unwrap_or_else(|_| "postgres".to_string());

        let database_url = format!(
            "postgres://{}:{}@{}:{}/{}",
            db_user, db_pwd, db_host, db_port, db_name
        );

        let redis_host = env::var("REDIS_HOST").unwrap_or_else(|_| "localhost".to_string());
        let redis_port = env::var("REDIS_PORT").unwrap_or_else(|_| "6379".to_string());
        let redis_password = env::var("REDIS_PASSWORD").unwrap_or_default();
        let redis_db = env::var("REDIS_DB").unwrap_or_else(|_| "0".to_string());

        let redis_url = if redis_password.is_empty() {
            format!("redis://{}:{}/{}", redis_host, redis_port, redis_db)
        } else {
            format!(
                "redis://:{}@{}:{}/{}",
                redis_password, redis_host, redis_port, redis_db
            )
        };

        let api_key = env::var("API_KEY").unwrap_or_default();
        if api_key.is_empty() {
            anyhow::bail!("API_KEY is not set");
        }

        let webhook_url =
            env::var("WEBHOOK_URL").unwrap_or_else(|_| "http://localhost:9090/webhook".to_string());
        let webhook_retry_attempts = env::var("WEBHOOK_RETRY_ATTEMPTS")
            .unwrap_or_else(|_| "3".to_string())
            .parse()
            .unwrap_or(3);
        let webhook_retry_delay_secs = env::var("WEBHOOK_RETRY_DELAY_SECONDS")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .unwrap_or(5);
        let webhook_timeout_secs = env::var("WEBHOOK_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        let stats_window_minutes = env::var("STATS_TIME_WINDOW_MINUTES")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .unwrap_or(60);

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            server_port,
            database_url,
            redis_url,
            api_key,
            webhook_url,
            webhook_retry_attempts,
            webhook_retry_delay_secs,
            webhook_timeout_secs,
            stats_window_minutes,
            log_level,
        })
    }
}
