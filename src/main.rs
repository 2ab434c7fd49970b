use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info, info_span, warn, Instrument};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

pub mod ai;
pub mod config;
pub mod error;
pub mod models;
pub mod narration;
pub mod parser;
pub mod solver;

use ai::{GeminiClient, GeminiSolver, SpaceClient, VideoSearch, YouTubeClient};
use config::Config;
use models::{
    ErrorResponse, ExplainRequest, ExplainResponse, HealthResponse, ProblemRequest, SolveResponse,
};
use narration::NarrationGenerator;
use parser::{extract_steps, render_flowchart, DEFAULT_MAX_STEPS};
use solver::{RetryPolicy, Solver, VideoLookup};

const BANNER: &str = r#"
  ____     _____      _
 / ___|___|_   _|   _| |_ ___  _ __
| |   / _ \ | || | | | __/ _ \| '__|
| |__| (_) || || |_| | || (_) | |
 \____\___/ |_| \__,_|\__\___/|_|

      [Hybrid Solver Service v0.1]
"#;

#[derive(Clone)]
pub struct AppState {
    solver: Arc<Solver>,
    narrator: Arc<NarrationGenerator>,
    primary_url: String,
    fallback_model: String,
    started_at: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, detail: impl Into<String>) -> ApiError {
    (status, Json(ErrorResponse::new(detail)))
}

/// Unwrap a JSON body, turning axum's plain-text rejection into the error envelope.
fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Rejected request body");
            Err(api_error(rejection.status(), rejection.body_text()))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cotutor_backend=info,tower_http=info")),
        )
        .init();

    println!("{}", BANNER);

    let config = Config::from_env().context("Invalid configuration")?;

    info!(
        primary = %config.space_url,
        fallback_model = %config.gemini_model,
        video_lookup = config.video_lookup_enabled(),
        fallback_attempts = config.fallback_max_attempts,
        "System check"
    );
    if !config.video_lookup_enabled() {
        warn!("YOUTUBE_API_KEY not set, tutorial videos disabled");
    }

    let state = build_state(&config)?;
    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Solver is online at http://{}/solve", addr);
    axum::serve(listener, build_router(state)).await?;

    Ok(())
}

/// Build every client once; handlers only ever read them.
fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let gemini = Arc::new(GeminiClient::new(
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
        config.gemini_base_url.clone(),
        config.request_timeout,
    )?);

    let primary = Arc::new(SpaceClient::new(
        config.space_url.clone(),
        config.space_api_name.clone(),
        config.hf_token.clone(),
        config.request_timeout,
    )?);

    let search = match &config.youtube_api_key {
        Some(key) => {
            let youtube: Arc<dyn VideoSearch> = Arc::new(YouTubeClient::new(
                key.clone(),
                config.youtube_base_url.clone(),
                config.request_timeout,
            )?);
            Some(youtube)
        }
        None => None,
    };

    let solver = Solver::new(
        primary,
        Arc::new(GeminiSolver::new(gemini.clone())),
        RetryPolicy::default().with_max_attempts(config.fallback_max_attempts),
        VideoLookup::new(gemini.clone(), search),
    );

    Ok(AppState {
        solver: Arc::new(solver),
        narrator: Arc::new(NarrationGenerator::new(gemini)),
        primary_url: config.space_url.clone(),
        fallback_model: config.gemini_model.clone(),
        started_at: chrono::Utc::now().to_rfc3339(),
    })
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/solve", post(solve))
        .route("/explain", post(explain))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn solve(
    State(state): State<AppState>,
    body: Result<Json<ProblemRequest>, JsonRejection>,
) -> Result<Json<SolveResponse>, ApiError> {
    let request = json_body(body)?;
    if request.problem.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Problem description is empty"));
    }

    let span = info_span!("solve", request_id = %Uuid::new_v4());
    match state.solver.solve(&request.problem).instrument(span).await {
        Ok(resolved) => {
            info!(source = %resolved.source, video = resolved.video_url.is_some(), "Solved");
            Ok(Json(SolveResponse::from(resolved)))
        }
        Err(e) => {
            error!(error = %e, "Solve failed");
            Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

async fn explain(
    State(state): State<AppState>,
    body: Result<Json<ExplainRequest>, JsonRejection>,
) -> Result<Json<ExplainResponse>, ApiError> {
    let request = json_body(body)?;
    let steps = extract_steps(&request.reasoning, request.max_steps.unwrap_or(DEFAULT_MAX_STEPS));
    let flowchart = render_flowchart(&steps);

    let span = info_span!("explain", request_id = %Uuid::new_v4(), steps = steps.len());
    let narration = state
        .narrator
        .generate_visual_narration(&request.problem, &steps)
        .instrument(span)
        .await
        .map_err(|e| {
            error!(error = %e, "Narration failed");
            api_error(StatusCode::BAD_GATEWAY, e.to_string())
        })?;

    Ok(Json(ExplainResponse {
        status: "success",
        steps,
        flowchart,
        narration,
    }))
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        primary: state.primary_url.clone(),
        fallback_model: state.fallback_model.clone(),
        video_lookup: state.solver.videos().is_enabled(),
        started_at: state.started_at.clone(),
    })
}
