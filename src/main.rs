use tracing_subscriber::EnvFilter;
use userbase::{app, state::AppState};

const DEFAULT_LOG_FILTER: &str = "userbase=debug,axum=info,tower_http=info";

/// `RUST_LOG` picks the filter; `LOG_FORMAT=json` switches to one JSON
/// object per line for log shippers.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => builder.with_target(false).json().init(),
        _ => builder.init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let state = AppState::init().await?;
    let (host, port) = (state.config.host.clone(), state.config.port);
    tracing::info!(%host, port, "starting userbase");

    app::serve(app::build_app(state), &host, port).await
}
