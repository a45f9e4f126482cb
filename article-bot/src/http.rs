use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use article::{render, ArticleResponse, ArticleService, Channel};
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::header::{ACCEPT_LANGUAGE, AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};

use crate::telegram::{TelegramBot, Update};

pub struct AppState {
    pub service: ArticleService,
    /// Present when a Telegram token is configured; receives webhook updates on `POST /`.
    pub bot: Option<TelegramBot>,
}

#[derive(Debug, Default, Deserialize)]
struct WordParams {
    #[serde(default)]
    word: String,
}

pub fn build_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/",
            get(get_article)
                .post(post_root)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .route(
            "/article",
            get(get_article)
                .post(post_article)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .route("/health", get(health))
        .fallback(not_found)
        .layer(cors_layer())
        .with_state(state)
}

pub async fn serve(
    bind: &str,
    service: ArticleService,
    telegram_token: Option<String>,
) -> anyhow::Result<()> {
    let bot = telegram_token.map(|token| TelegramBot::new(token, service.clone()));
    if bot.is_none() {
        tracing::info!("no Telegram token configured, webhook updates are disabled");
    }
    let app = build_app(Arc::new(AppState { service, bot }));

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind to {bind}"))?;
    tracing::info!("listening on {bind}");
    axum::serve(listener, app).await?;
    Ok(())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT_LANGUAGE, AUTHORIZATION])
        .max_age(Duration::from_secs(86400))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not found")
}

async fn method_not_allowed() -> Response {
    error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

async fn get_article(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<WordParams>,
) -> Response {
    lookup(&state, &params.word, &headers).await
}

async fn post_article(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    match serde_json::from_slice::<WordParams>(&body) {
        Ok(params) => lookup(&state, &params.word, &headers).await,
        Err(error) => {
            tracing::error!(%error, "failed to decode JSON body");
            error_response(StatusCode::BAD_REQUEST, "Invalid JSON format")
        }
    }
}

/// `POST /` carries both API requests and Telegram webhook updates.
async fn post_root(State(state): State<Arc<AppState>>, headers: HeaderMap, body: Bytes) -> Response {
    if let Some(bot) = &state.bot {
        if let Ok(update) = serde_json::from_slice::<Update>(&body) {
            if update.update_id > 0 {
                if let Err(error) = bot.handle_update(update).await {
                    tracing::error!(%error, "failed to handle Telegram update");
                }
                return StatusCode::OK.into_response();
            }
        }
    }
    post_article(State(state), headers, body).await
}

async fn lookup(state: &AppState, word: &str, headers: &HeaderMap) -> Response {
    if word.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Word parameter is required");
    }
    let language = headers
        .get(ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    match state.service.determine_word(word, language).await {
        Ok(response) => json_response(StatusCode::OK, &response),
        Err(error) => {
            tracing::error!(word, %error, "article lookup failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    json_response(status, &ArticleResponse::failure(message))
}

fn json_response(status: StatusCode, response: &ArticleResponse) -> Response {
    match render(response, Channel::Api) {
        Ok(body) => (status, [(CONTENT_TYPE, "application/json")], body).into_response(),
        Err(error) => {
            tracing::error!(%error, "failed to serialize response");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
