mod advisor;
mod chat;
mod config;
mod error;
mod ingest;
mod rate_limit;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use advisor::{Advisor, GeminiAdvisor};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = config::AppConfig::from_env();

    let advisor: Option<Arc<dyn Advisor>> = match GeminiAdvisor::from_env() {
        Ok(advisor) => {
            tracing::info!(
                analyze_model = advisor.analyze_model(),
                image_model = advisor.image_model(),
                "advisor configured"
            );
            Some(Arc::new(advisor))
        }
        Err(e) => {
            tracing::warn!(error = %e, "advisor not configured; analysis and visualization disabled");
            None
        }
    };

    let state = state::AppState::new(advisor, config);

    // Spawn background idle-session sweeper.
    let _sweeper = services::sweeper::spawn_idle_sweeper(state.clone());

    let app = routes::app(state);
    let port = config.port;
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "interiorcost listening");
    axum::serve(listener, app).await.expect("server failed");
}
