mod api_error;
mod calibration_loop;
mod config;
mod routes_calibration;
mod routes_claims;
mod routes_reports;
mod seed;
mod state;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{routing::{get, post, put}, Router};
use calibration::InMemoryFeedbackStore;
use claims::InMemoryClaimStore;
use engine::{DiligenceEngine, EngineConfig};
use narrative::{LmStudioNarrator, NarrativeGenerator};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env()?;

    let claims = Arc::new(InMemoryClaimStore::new());
    let feedback = Arc::new(InMemoryFeedbackStore::new());
    if let Some(path) = &cfg.seed_path {
        seed::load_seed(path, &claims, &feedback).await?;
    }

    let engine_cfg = EngineConfig {
        calibration: cfg.calibration.clone(),
        narrative_timeout: cfg.narrative_timeout,
        ..EngineConfig::default()
    };
    let mut engine = DiligenceEngine::new(claims.clone(), feedback.clone(), engine_cfg);
    if let Some(url) = &cfg.narrative_url {
        let narrator = LmStudioNarrator::new(url.clone(), cfg.narrative_model.clone());
        match narrator.ping().await {
            Ok(()) => info!(url = %url, "narrative: ok"),
            Err(e) => warn!(url = %url, "narrative: unreachable, using template summaries: {e}"),
        }
        engine = engine.with_narrator(Arc::new(narrator));
    }

    let app_state = Arc::new(AppState::new(claims, feedback, engine));

    if let Some(every) = cfg.calibration_interval {
        let shared_for_loop = app_state.clone();
        tokio::spawn(async move {
            crate::calibration_loop::run_calibration_loop(shared_for_loop, every).await;
        });
    }

    let app = Router::new()
        .route("/applications/:id/claims", put(crate::routes_claims::put_claims))
        .route(
            "/applications/:id/claims/:claim_id/verification",
            post(crate::routes_claims::post_verification),
        )
        .route("/applications/:id/reports", post(crate::routes_reports::post_report))
        .route("/applications/:id/reports", get(crate::routes_reports::get_reports))
        .route("/feedback", post(crate::routes_calibration::post_feedback))
        .route("/calibration/runs", post(crate::routes_calibration::post_calibration_run))
        .route("/calibration/runs", get(crate::routes_calibration::get_calibration_runs))
        .route("/weights", get(crate::routes_calibration::get_weights))
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let addr = &cfg.bind_addr;
    info!("scoring-service listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
