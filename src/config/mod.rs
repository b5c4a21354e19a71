use std::env;

const DEFAULT_TONAPI_BASE: &str = "https://testnet.tonapi.io";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,

    // Telegram init-data verification
    pub telegram_bot_token: String,
    pub auth_max_age_secs: i64,

    // Session tokens
    pub jwt_secret: String,
    pub jwt_ttl_days: i64,

    // TON balance proxy
    pub tonapi_base: String,
    pub tonapi_key: Option<String>,

    // CORS: empty list means any origin
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let origins_raw = env::var("ALLOWED_ORIGINS").unwrap_or_default();
        let allowed_origins: Vec<String> = origins_raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,

            telegram_bot_token: env::var("TELEGRAM_BOT_TOKEN")
                .unwrap_or_default()
                .trim()
                .to_string(),
            auth_max_age_secs: env::var("AUTH_MAX_AGE_SECS")
                .unwrap_or_else(|_| "600".into())
                .parse()
                .unwrap_or(600),

            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| "change_me".into()),
            jwt_ttl_days: env::var("JWT_TTL_DAYS")
                .unwrap_or_else(|_| "7".into())
                .parse()
                .unwrap_or(7),

            tonapi_base: env::var("TONAPI_BASE").unwrap_or_else(|_| DEFAULT_TONAPI_BASE.into()),
            tonapi_key: env::var("TONAPI_KEY").ok().filter(|k| !k.is_empty()),

            allowed_origins,
        })
    }
}
