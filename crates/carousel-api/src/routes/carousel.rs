//! Routes for carousel sessions.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing::get, routing::post};
use carousel_core::command::Command;
use carousel_document::application::loader::{load, parse_yaml};
use carousel_document::domain::template::Variables;
use carousel_session::application::carousel::Carousel;
use carousel_session::application::query_handlers::CarouselView;
use carousel_session::domain::commands::Input;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::notifications::{Notification, NotificationHost};
use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct CreateCarouselRequest {
    /// The carousel document, as a JSON object or as JSON/YAML text.
    pub document: Value,
    /// Card set for the cards bubbles.
    #[serde(default)]
    pub cards: Option<Value>,
    /// Template variables substituted into the document and card set.
    #[serde(default)]
    pub variable: Variables,
}

/// Request body for POST /{id}/tick.
#[derive(Debug, Deserialize)]
pub struct TickRequest {
    /// Virtual milliseconds to advance.
    pub elapsed_ms: u64,
}

/// Response body for every carousel endpoint.
#[derive(Debug, Serialize)]
pub struct CarouselResponse {
    /// The session identifier.
    pub session_id: Uuid,
    /// The current frame; `null` for an empty document.
    pub view: Option<CarouselView>,
    /// Host callbacks raised while handling the request.
    pub notifications: Vec<Notification>,
}

fn raw_document(document: Value) -> Result<Value, ApiError> {
    match document {
        Value::String(text) => Ok(parse_yaml(&text)?),
        other => Ok(other),
    }
}

/// POST /
#[instrument(skip(state, request))]
async fn create_carousel(
    State(state): State<AppState>,
    Json(request): Json<CreateCarouselRequest>,
) -> Result<(StatusCode, Json<CarouselResponse>), ApiError> {
    let raw = raw_document(request.document)?;
    let loaded = load(
        &raw,
        request.cards.as_ref(),
        &request.variable,
        state.config.max_template_depth,
    );

    let mut host = NotificationHost::new();
    let carousel = Carousel::start(
        Uuid::new_v4(),
        loaded,
        state.config.clone(),
        state.clock.clone(),
        &mut host,
    );
    let view = carousel.view();
    let session_id = state.insert(carousel).await;

    info!(%session_id, "carousel session created");

    Ok((
        StatusCode::CREATED,
        Json(CarouselResponse {
            session_id,
            view,
            notifications: host.into_notifications(),
        }),
    ))
}

/// GET /{id}
#[instrument(skip_all, fields(session_id = %session_id))]
async fn get_carousel(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<CarouselResponse>, ApiError> {
    let session = state.session(session_id).await?;
    let mut hosted = session.lock().await;
    let mut host = NotificationHost::new();
    hosted.catch_up(state.clock.now(), &mut host);

    Ok(Json(CarouselResponse {
        session_id,
        view: hosted.carousel.view(),
        notifications: host.into_notifications(),
    }))
}

/// DELETE /{id}
#[instrument(skip_all, fields(session_id = %session_id))]
async fn delete_carousel(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.remove(session_id).await?;
    info!("carousel session removed");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /{id}/input
#[instrument(skip_all, fields(session_id = %session_id, command = input.command_type()))]
async fn send_input(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(input): Json<Input>,
) -> Result<Json<CarouselResponse>, ApiError> {
    let session = state.session(session_id).await?;
    let mut hosted = session.lock().await;
    let mut host = NotificationHost::new();
    hosted.catch_up(state.clock.now(), &mut host);
    info!("handling carousel input");
    hosted.carousel.handle(input, &mut host);

    Ok(Json(CarouselResponse {
        session_id,
        view: hosted.carousel.view(),
        notifications: host.into_notifications(),
    }))
}

/// POST /{id}/tick
#[instrument(skip_all, fields(session_id = %session_id, elapsed_ms = request.elapsed_ms))]
async fn tick(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<TickRequest>,
) -> Result<Json<CarouselResponse>, ApiError> {
    let session = state.session(session_id).await?;
    let mut hosted = session.lock().await;
    let mut host = NotificationHost::new();
    hosted.catch_up(state.clock.now(), &mut host);
    info!("advancing carousel time");
    hosted.carousel.advance_time(request.elapsed_ms, &mut host);

    Ok(Json(CarouselResponse {
        session_id,
        view: hosted.carousel.view(),
        notifications: host.into_notifications(),
    }))
}

/// Returns the router for carousel sessions.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_carousel))
        .route("/{id}", get(get_carousel).delete(delete_carousel))
        .route("/{id}/input", post(send_input))
        .route("/{id}/tick", post(tick))
}
