use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    loanportal_observability::init();

    let config = loanportal_api::ApiConfig::from_env()?;
    let bind_addr = config.bind_addr;

    let app = loanportal_api::app::build_app(config);

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")
}
