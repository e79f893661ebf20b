//! Session routes: create, inspect, and drive a guided assessment.
//!
//! Handlers translate request bodies into chat events and hand them to the
//! session runner. Paid steps (mood selection starts analysis, visualize
//! starts image synthesis) are gated on advisor configuration and the rate
//! limiter before the event is submitted; a slot taken for an event the
//! session rejects is released again.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chat::machine::Event;
use crate::chat::options::{Budget, Mood};
use crate::error::{ApiError, ErrorCode};
use crate::ingest::{self, IngestError};
use crate::rate_limit::RateLimitError;
use crate::services::session::{SessionError, SessionHandle, SessionSnapshot};
use crate::state::AppState;

// =============================================================================
// ERRORS
// =============================================================================

/// Request problems detected before an event reaches the session.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("unknown budget tier: {0}")]
    UnknownBudget(String),
    #[error("unknown mood: {0}")]
    UnknownMood(String),
    #[error("advisor is not configured")]
    AdvisorUnavailable,
}

impl ErrorCode for RequestError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownBudget(_) => "E_UNKNOWN_BUDGET",
            Self::UnknownMood(_) => "E_UNKNOWN_MOOD",
            Self::AdvisorUnavailable => "E_ADVISOR_UNAVAILABLE",
        }
    }
}

pub(crate) fn session_error_to_status(err: &SessionError) -> StatusCode {
    match err {
        SessionError::NotFound(_) => StatusCode::NOT_FOUND,
        SessionError::Closed(_) => StatusCode::GONE,
        SessionError::Transition(_) => StatusCode::CONFLICT,
    }
}

pub(crate) fn request_error_to_status(err: &RequestError) -> StatusCode {
    match err {
        RequestError::UnknownBudget(_) | RequestError::UnknownMood(_) => StatusCode::BAD_REQUEST,
        RequestError::AdvisorUnavailable => StatusCode::SERVICE_UNAVAILABLE,
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        Self::new(session_error_to_status(&err), &err)
    }
}

impl From<RequestError> for ApiError {
    fn from(err: RequestError) -> Self {
        Self::new(request_error_to_status(&err), &err)
    }
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        Self::new(StatusCode::BAD_REQUEST, &err)
    }
}

impl From<RateLimitError> for ApiError {
    fn from(err: RateLimitError) -> Self {
        Self::new(StatusCode::TOO_MANY_REQUESTS, &err)
    }
}

// =============================================================================
// BODIES
// =============================================================================

#[derive(Deserialize)]
pub struct PhotoBody {
    /// `data:image/...;base64,...`
    pub image: String,
}

#[derive(Deserialize)]
pub struct BudgetBody {
    pub budget: String,
}

#[derive(Deserialize)]
pub struct MoodBody {
    pub mood: String,
}

#[derive(Serialize)]
pub struct BudgetOption {
    pub id: Budget,
    pub label: &'static str,
    pub icon: &'static str,
}

#[derive(Serialize)]
pub struct OptionsResponse {
    pub budgets: Vec<BudgetOption>,
    pub moods: Vec<Mood>,
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `GET /api/options`: budget tiers and moods for rendering choices.
pub async fn list_options() -> Json<OptionsResponse> {
    let budgets = Budget::ALL
        .into_iter()
        .map(|b| BudgetOption { id: b, label: b.label(), icon: b.icon() })
        .collect();
    Json(OptionsResponse { budgets, moods: Mood::ALL.to_vec() })
}

/// `POST /api/sessions`: start a new conversation.
pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionSnapshot>) {
    let handle = state.sessions.create().await;
    (StatusCode::CREATED, Json(handle.snapshot()))
}

/// `GET /api/sessions/:id`: current snapshot.
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let handle = state.sessions.get(id).await?;
    Ok(Json(handle.snapshot()))
}

/// `DELETE /api/sessions/:id`: discard a conversation.
pub async fn delete_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, ApiError> {
    state.sessions.remove(id).await?;
    state.rate_limiter.forget(id);
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/sessions/:id/photo`: upload the room photo.
pub async fn submit_photo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<PhotoBody>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let handle = state.sessions.get(id).await?;
    let image = ingest::decode_data_url(&body.image)?;
    Ok(Json(handle.send(Event::PhotoSupplied(image)).await?))
}

/// `POST /api/sessions/:id/budget`: pick a budget tier.
pub async fn choose_budget(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<BudgetBody>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let handle = state.sessions.get(id).await?;
    let budget = Budget::from_str(&body.budget).ok_or_else(|| RequestError::UnknownBudget(body.budget.clone()))?;
    Ok(Json(handle.send(Event::BudgetChosen(budget)).await?))
}

/// `POST /api/sessions/:id/mood`: pick a mood; starts analysis.
pub async fn choose_mood(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<MoodBody>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let handle = state.sessions.get(id).await?;
    let mood = Mood::from_str(&body.mood).ok_or_else(|| RequestError::UnknownMood(body.mood.clone()))?;
    admit_advisor_call(&state, id)?;
    send_admitted(&state, &handle, Event::MoodChosen(mood)).await
}

/// `POST /api/sessions/:id/visualize`: request the "after" image.
pub async fn request_visualize(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let handle = state.sessions.get(id).await?;
    admit_advisor_call(&state, id)?;
    send_admitted(&state, &handle, Event::VisualizeRequested).await
}

/// `POST /api/sessions/:id/reset`: start over with a new photo.
pub async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let handle = state.sessions.get(id).await?;
    Ok(Json(handle.send(Event::ResetRequested).await?))
}

/// Gate for events that start a paid advisor call.
fn admit_advisor_call(state: &AppState, session_id: Uuid) -> Result<(), ApiError> {
    if state.advisor.is_none() {
        return Err(RequestError::AdvisorUnavailable.into());
    }
    state.rate_limiter.check_and_record(session_id)?;
    Ok(())
}

/// Submit an admitted event; a rejection hands its rate-limit slot back.
async fn send_admitted(
    state: &AppState,
    handle: &SessionHandle,
    event: Event,
) -> Result<Json<SessionSnapshot>, ApiError> {
    match handle.send(event).await {
        Ok(snapshot) => Ok(Json(snapshot)),
        Err(err) => {
            state.rate_limiter.release(handle.id());
            Err(err.into())
        }
    }
}

#[cfg(test)]
#[path = "sessions_test.rs"]
mod tests;
