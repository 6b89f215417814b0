//! HTTP routes and server startup.

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::Uri,
    response::{Html, Json},
    routing::{get, post},
    Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::assets::AssetStore;
use crate::caption::{self, generate_caption, CaptionResponse, Captioner};
use crate::config::Config;
use crate::error::AppError;
use crate::pages::{render_home, render_use_case, UseCase};
use crate::upload::read_upload;

/// Room for multipart boundaries and headers on top of the file limit.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub struct AppState {
    pub config: Config,
    pub assets: AssetStore,
    pub captioner: Arc<dyn Captioner>,
}

impl AppState {
    pub fn new(config: Config, captioner: Arc<dyn Captioner>) -> Self {
        let assets = AssetStore::new(config.static_dir.clone(), config.stylesheet.clone());
        Self {
            config,
            assets,
            captioner,
        }
    }
}

pub fn create_app(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD;
    let static_files = ServeDir::new(&state.config.static_dir);

    let mut app = Router::new().route("/", get(home)).route("/health", get(health));

    for case in UseCase::ALL {
        app = app.route(
            &format!("/{}", case.slug()),
            get(move |State(state): State<Arc<AppState>>| use_case_page(state, case)),
        );
        if case.offers_captioning() {
            app = app.route(
                &format!("/{}/caption", case.slug()),
                post(upload_image).layer(DefaultBodyLimit::max(body_limit)),
            );
        }
    }

    app.nest_service("/static", static_files)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn home(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render_home(&state.assets).await)
}

async fn use_case_page(state: Arc<AppState>, case: UseCase) -> Html<String> {
    Html(render_use_case(&state.assets, case, state.config.max_table_rows).await)
}

async fn upload_image(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<CaptionResponse>, AppError> {
    let upload = read_upload(&mut multipart, state.config.max_upload_bytes).await?;

    tracing::info!(
        file_name = %upload.file_name,
        width = upload.image.width(),
        height = upload.image.height(),
        "📸 captioning upload"
    );

    let response = generate_caption(
        state.captioner.as_ref(),
        &upload.image,
        state.config.model_timeout(),
    )
    .await?;

    Ok(Json(response))
}

async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "model": state.captioner.model_name(),
    }))
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

/// Builds the captioner from `config` and serves until Ctrl-C.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let captioner = caption::from_config(&config)?;
    let bind = config.bind;

    tracing::info!(
        provider = ?config.provider,
        model = captioner.model_name(),
        static_dir = %config.static_dir.display(),
        "captioning backend ready"
    );

    let app = create_app(Arc::new(AppState::new(config, captioner)));
    let listener = tokio::net::TcpListener::bind(bind).await?;

    tracing::info!("🚀 Server running on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
