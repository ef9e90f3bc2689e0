use std::sync::Arc;

use anyhow::Context;

use estate_bot::channels::{LineClient, MessagingApi};
use estate_bot::config::{BotConfig, RichMenuMap};
use estate_bot::funnel::{FunnelDeps, FunnelEngine};
use estate_bot::intent::TextClassifier;
use estate_bot::reply::ReplyContext;
use estate_bot::store::LibSqlBackend;
use estate_bot::webhook::{Dispatcher, WebhookState, webhook_routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; real deployments set the environment directly
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = BotConfig::from_env().context("loading configuration")?;

    eprintln!("🏡 Estate Bot v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Webhook: http://0.0.0.0:{}/webhook", config.port);
    eprintln!("   Database: {}", config.db_path.display());

    let db = Arc::new(
        LibSqlBackend::new_local(&config.db_path)
            .await
            .context("opening database")?,
    );
    let rich_menus = Arc::new(RichMenuMap::load(&config.rich_menu_ids_path)?);

    let messaging: Arc<dyn MessagingApi> = Arc::new(LineClient::new(
        config.channel_access_token.clone(),
        config.api_timeout,
    )?);

    let engine = FunnelEngine::new(FunnelDeps {
        profiles: db.clone(),
        catalog: db,
        messaging: messaging.clone(),
        rich_menus,
        admin_notify_target: config.admin_notify_target.clone(),
    });
    let dispatcher = Dispatcher::new(
        engine,
        Arc::new(TextClassifier::default_rules()),
        messaging,
        Arc::new(ReplyContext {
            reservation_picker_url: config.reservation_picker_url.clone(),
        }),
    );

    let app = webhook_routes(WebhookState {
        dispatcher,
        channel_secret: Arc::new(config.channel_secret.clone()),
    });

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .with_context(|| format!("binding port {}", config.port))?;
    tracing::info!(port = config.port, "Webhook server started");
    axum::serve(listener, app).await?;

    Ok(())
}
