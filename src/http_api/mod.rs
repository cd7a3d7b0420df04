use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use chrono::NaiveDate;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::{
    AvailabilityCalendar, AvailabilityConfig, AvailabilityStore, DaySchedule, DaySummary,
    SchedulingError, SlotId, TimeOfDay, TimeSlot, WeekSchedule, Weekday,
    WeeklyAvailabilityScheduler, generate_time_options, summarize_week,
};

#[derive(Clone)]
pub struct AppState {
    scheduler: Arc<RwLock<WeeklyAvailabilityScheduler>>,
    config: Arc<AvailabilityConfig>,
    store: Option<Arc<dyn AvailabilityStore + Send + Sync>>,
}

impl AppState {
    pub fn new(scheduler: WeeklyAvailabilityScheduler, config: AvailabilityConfig) -> Self {
        Self {
            scheduler: Arc::new(RwLock::new(scheduler)),
            config: Arc::new(config),
            store: None,
        }
    }

    pub fn with_store(mut self, store: Arc<dyn AvailabilityStore + Send + Sync>) -> Self {
        self.store = Some(store);
        self
    }

    fn scheduler(&self) -> Arc<RwLock<WeeklyAvailabilityScheduler>> {
        self.scheduler.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Conflict(&'static str, String),
    Invalid(&'static str, String),
    Unavailable(String),
    Internal(String),
}

impl ApiError {
    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid("invalid_request", message.into())
    }
}

impl From<SchedulingError> for ApiError {
    fn from(value: SchedulingError) -> Self {
        match value {
            SchedulingError::Overlap { .. } => ApiError::Conflict(value.code(), value.to_string()),
            _ => ApiError::Invalid(value.code(), value.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Conflict(code, message) => (StatusCode::CONFLICT, code, message),
            ApiError::Invalid(code, message) => (StatusCode::BAD_REQUEST, code, message),
            ApiError::Unavailable(message) => {
                (StatusCode::SERVICE_UNAVAILABLE, "unavailable", message)
            }
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct AvailabilityPayload {
    available: bool,
}

#[derive(Debug, Default, Deserialize)]
struct SlotPayload {
    #[serde(default)]
    start: Option<String>,
    #[serde(default)]
    end: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TimeOptionsQuery {
    granularity: Option<u16>,
}

#[derive(Debug, Serialize)]
struct TimeOption {
    value: TimeOfDay,
    label: String,
}

impl From<TimeOfDay> for TimeOption {
    fn from(value: TimeOfDay) -> Self {
        Self {
            value,
            label: value.to_display_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct BookableDay {
    date: NaiveDate,
    times: Vec<TimeOption>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/schedule", get(get_week))
        .route("/summary", get(get_summary))
        .route("/schedule/:day", get(get_day))
        .route("/schedule/:day/availability", put(set_availability))
        .route("/schedule/:day/slots", post(add_slot))
        .route("/schedule/:day/slots/:id", delete(remove_slot))
        .route("/time-options", get(time_options))
        .route("/bookable/:date", get(bookable_times))
        .route("/save", post(save_schedule))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

fn parse_day(raw: &str) -> Result<Weekday, ApiError> {
    raw.parse::<Weekday>()
        .map_err(|err| ApiError::NotFound(err.to_string()))
}

/// Absent and blank fields both count as not provided.
fn parse_optional_time(raw: Option<&str>) -> Result<Option<TimeOfDay>, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => text
            .parse::<TimeOfDay>()
            .map(Some)
            .map_err(|err| ApiError::invalid(err.to_string())),
    }
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn get_week(State(state): State<AppState>) -> Json<WeekSchedule> {
    let scheduler = state.scheduler();
    let week = scheduler.read().snapshot();
    Json(week)
}

async fn get_summary(State(state): State<AppState>) -> Json<Vec<DaySummary>> {
    let scheduler = state.scheduler();
    let summary = summarize_week(scheduler.read().week());
    Json(summary)
}

async fn get_day(
    State(state): State<AppState>,
    Path(day): Path<String>,
) -> Result<Json<DaySchedule>, ApiError> {
    let day = parse_day(&day)?;
    let scheduler = state.scheduler();
    let schedule = scheduler.read().day(day).clone();
    Ok(Json(schedule))
}

async fn set_availability(
    State(state): State<AppState>,
    Path(day): Path<String>,
    Json(payload): Json<AvailabilityPayload>,
) -> Result<Json<DaySchedule>, ApiError> {
    let day = parse_day(&day)?;
    let scheduler = state.scheduler();
    let updated = {
        let mut guard = scheduler.write();
        guard.set_day_availability(day, payload.available);
        guard.day(day).clone()
    };
    Ok(Json(updated))
}

async fn add_slot(
    State(state): State<AppState>,
    Path(day): Path<String>,
    Json(payload): Json<SlotPayload>,
) -> Result<(StatusCode, Json<TimeSlot>), ApiError> {
    let day = parse_day(&day)?;
    let start = parse_optional_time(payload.start.as_deref())?;
    let end = parse_optional_time(payload.end.as_deref())?;
    let scheduler = state.scheduler();
    let slot = {
        let mut guard = scheduler.write();
        // The scheduler treats this as a caller bug, so refuse it here.
        let well_formed = matches!((start, end), (Some(s), Some(e)) if s < e);
        if well_formed && !guard.is_available(day) {
            return Err(ApiError::Conflict(
                "day_unavailable",
                format!("{day} is unavailable; enable it before adding slots"),
            ));
        }
        guard.add_slot(day, start, end)?
    };
    Ok((StatusCode::CREATED, Json(slot)))
}

async fn remove_slot(
    State(state): State<AppState>,
    Path((day, id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let day = parse_day(&day)?;
    let id: SlotId = id
        .parse()
        .map_err(|_| ApiError::invalid(format!("invalid slot id '{id}'")))?;
    let scheduler = state.scheduler();
    scheduler.write().remove_slot(day, id);
    Ok(StatusCode::NO_CONTENT)
}

async fn time_options(
    State(state): State<AppState>,
    Query(query): Query<TimeOptionsQuery>,
) -> Result<Json<Vec<TimeOption>>, ApiError> {
    let granularity = query
        .granularity
        .unwrap_or(state.config.slot_granularity_minutes);
    if granularity == 0 || granularity > crate::time::MINUTES_PER_DAY {
        return Err(ApiError::invalid(format!(
            "granularity must be between 1 and {} minutes",
            crate::time::MINUTES_PER_DAY
        )));
    }
    let options = generate_time_options(granularity)
        .into_iter()
        .map(TimeOption::from)
        .collect();
    Ok(Json(options))
}

async fn bookable_times(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<BookableDay>, ApiError> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|err| ApiError::invalid(format!("invalid date '{date}': {err}")))?;
    let scheduler = state.scheduler();
    let calendar = AvailabilityCalendar::from_config(scheduler.read().snapshot(), &state.config);
    let mut times = Vec::new();
    for start in calendar.appointment_starts(date, state.config.appointment_minutes) {
        let time = TimeOfDay::try_from(start.time())
            .map_err(|err| ApiError::Internal(err.to_string()))?;
        times.push(TimeOption::from(time));
    }
    Ok(Json(BookableDay { date, times }))
}

async fn save_schedule(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    let Some(store) = state.store.clone() else {
        return Err(ApiError::Unavailable(
            "no availability store configured".to_string(),
        ));
    };
    let snapshot = state.scheduler().read().snapshot();
    let slots = snapshot.total_slots();
    let saved = tokio::task::spawn_blocking(move || store.save_schedule(&snapshot))
        .await
        .map_err(|err| ApiError::Internal(format!("save task failed: {err}")))?;
    match saved {
        Ok(()) => {
            info!(slots, "schedule saved via api");
            Ok(StatusCode::NO_CONTENT)
        }
        Err(err) => {
            warn!(error = %err, "schedule save failed");
            Err(ApiError::Internal(err.to_string()))
        }
    }
}
