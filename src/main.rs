use anyhow::Context;
use fridge_tracker::{
    notification::{start_expiry_scheduler, WebPushTransport},
    routes::create_router,
    state::{AppState, Config},
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,fridge_tracker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration; missing credentials abort startup
    let config = Config::from_env()?;

    let vapid_pem = tokio::fs::read(&config.vapid_private_key_file)
        .await
        .with_context(|| {
            format!(
                "failed to read VAPID private key {}",
                config.vapid_private_key_file.display()
            )
        })?;
    let transport = WebPushTransport::new(vapid_pem, config.vapid_subject.clone())
        .map_err(|e| anyhow::anyhow!("failed to create web push client: {}", e))?;

    let state = AppState::new(config, Arc::new(transport)).await?;

    // Start expiry notifier; the scheduler handle must outlive the server
    let _scheduler = start_expiry_scheduler(
        state.expiry_notifier(),
        &state.config.expiry_check_schedule,
    )
    .await
    .map_err(|e| anyhow::anyhow!("failed to start expiry notifier: {:?}", e))?;

    let addr = state.config.bind_addr();
    let app = create_router(state);

    tracing::info!("Server starting on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
