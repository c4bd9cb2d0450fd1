//! Check-in endpoint handlers.
//!
//! Guest routes only ever return [`GuestCheckinView`], whose lock code has
//! passed through the lock access gate. Staff routes return
//! [`StaffCheckinView`] with the staged code and its visibility flag.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use validator::Validate;

use domain::models::{
    ArrivalsQuery, GuestCheckinView, ListCheckinsResponse, NewCheckin, SetLockAccessRequest,
    StaffCheckinView,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{AppJson, AppQuery};
use crate::middleware::RequestId;

/// Submit a guest check-in.
///
/// POST /api/v1/checkins
///
/// Every submission creates a new record, including repeats for the same
/// booking.
pub async fn create_checkin(
    State(state): State<AppState>,
    AppJson(request): AppJson<NewCheckin>,
) -> Result<(StatusCode, Json<GuestCheckinView>), ApiError> {
    let record = state.checkins.create(request).await?;
    Ok((StatusCode::CREATED, Json(GuestCheckinView::from(&record))))
}

/// Guest view of one check-in.
///
/// GET /api/v1/checkins/:id
pub async fn get_checkin(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<GuestCheckinView>, ApiError> {
    let record = state
        .checkins
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Check-in {id} not found")))?;
    Ok(Json(GuestCheckinView::from(&record)))
}

/// Guest view of the latest check-in for a booking.
///
/// GET /api/v1/apartments/:apartment_id/bookings/:booking_token
pub async fn get_booking_checkin(
    State(state): State<AppState>,
    Path((apartment_id, booking_token)): Path<(String, String)>,
) -> Result<Json<GuestCheckinView>, ApiError> {
    let record = state
        .checkins
        .find_by_booking_token(&apartment_id, &booking_token)
        .await?
        .ok_or_else(|| ApiError::NotFound("No check-in for this booking".to_string()))?;
    Ok(Json(GuestCheckinView::from(&record)))
}

/// Manager list of every check-in for an apartment.
///
/// GET /api/v1/apartments/:apartment_id/checkins
pub async fn list_apartment_checkins(
    State(state): State<AppState>,
    Path(apartment_id): Path<String>,
) -> Result<Json<ListCheckinsResponse>, ApiError> {
    let records = state.checkins.list_by_apartment(&apartment_id).await?;
    Ok(Json(to_list_response(records)))
}

/// Staff list of arrivals in an inclusive date window.
///
/// GET /api/v1/arrivals?from=YYYY-MM-DD&to=YYYY-MM-DD
pub async fn list_arrivals(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ArrivalsQuery>,
) -> Result<Json<ListCheckinsResponse>, ApiError> {
    query.validate()?;
    let records = state
        .checkins
        .list_arrivals_between(query.from, query.to)
        .await?;
    Ok(Json(to_list_response(records)))
}

/// Stage or reveal a lock code.
///
/// PUT /api/v1/checkins/:id/lock
pub async fn set_lock_access(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<i64>,
    AppJson(request): AppJson<SetLockAccessRequest>,
) -> Result<Json<StaffCheckinView>, ApiError> {
    let code = request.normalized_code();
    let record = state
        .checkins
        .set_lock_access(id, code.as_deref(), request.visible)
        .await?;

    tracing::info!(
        request_id = %request_id.0,
        checkin_id = id,
        visible = request.visible,
        "Staff updated lock access"
    );
    Ok(Json(StaffCheckinView::from(record)))
}

fn to_list_response(records: Vec<domain::models::CheckinRecord>) -> ListCheckinsResponse {
    let checkins: Vec<StaffCheckinView> = records.into_iter().map(Into::into).collect();
    ListCheckinsResponse {
        total: checkins.len(),
        checkins,
    }
}
