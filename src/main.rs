use std::net::SocketAddr;

use tracing_subscriber::{fmt, EnvFilter};

use chatroom_server::{app::bootstrap::build_app, infra::config::AppConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let config = AppConfig::from_env()?;
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let (app, _state) = build_app(config).await?;

    tracing::info!(%addr, "starting chatroom server");
    axum::Server::bind(&addr)
        .serve(app.into_make_service_with_connect_info::<SocketAddr>())
        .await?;

    Ok(())
}
