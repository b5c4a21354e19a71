use truestake::api::router::create_router;
use truestake::config::AppConfig;
use truestake::ton::TonClient;
use truestake::{db, metrics, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let addr = format!("{}:{}", config.host, config.port);

    tracing::info!("Connecting to database...");
    let db = db::init_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&db).await?;
    tracing::info!("Database connected");

    if config.telegram_bot_token.is_empty() {
        tracing::warn!("TELEGRAM_BOT_TOKEN is empty — /auth/telegram will reject all logins");
    }

    let metrics_handle = metrics::init_metrics();

    let http = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .build()?;
    let ton = TonClient::new(http, config.tonapi_base.clone(), config.tonapi_key.clone());

    let state = AppState {
        db,
        config,
        ton,
        metrics_handle,
    };
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {addr}");
    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();
}
