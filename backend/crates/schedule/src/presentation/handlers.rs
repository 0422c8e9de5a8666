//! HTTP Handlers

use axum::Json;
use axum::extract::{OriginalUri, Path, Query, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::IntoResponse;
use axum_extra::extract::WithRejection;
use kernel::id::ReservationId;
use std::sync::Arc;

use auth::Principal;

use crate::application::config::ScheduleConfig;
use crate::application::{ReservationCommandUseCase, ScheduleQuery, ScheduleQueryUseCase};
use crate::domain::policy;
use crate::domain::repository::ReservationRepository;
use crate::error::{ScheduleError, ScheduleResult};
use crate::presentation::dto::{RangeParams, ReservationRequest, ReservationView, ScheduleView};
use crate::presentation::mapper::{reservation_to_view, request_to_draft, schedule_to_view};

/// Shared state for schedule handlers
#[derive(Clone)]
pub struct ScheduleAppState<R>
where
    R: ReservationRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<ScheduleConfig>,
}

/// `/schedule/{id}`, built from the collection path of the current request
fn reservation_location(collection: &str, id: ReservationId) -> ScheduleResult<HeaderValue> {
    let value = format!("{}/{}", collection.trim_end_matches('/'), id);
    HeaderValue::from_str(&value)
        .map_err(|_| ScheduleError::Internal(format!("Invalid Location header: {value}")))
}

/// GET /schedule?from=YYYY-MM-DD&to=YYYY-MM-DD
pub async fn get_schedule<R>(
    State(state): State<ScheduleAppState<R>>,
    principal: Principal,
    WithRejection(Query(params), _): WithRejection<Query<RangeParams>, ScheduleError>,
) -> ScheduleResult<Json<ScheduleView>>
where
    R: ReservationRepository + Clone + Send + Sync + 'static,
{
    let output = ScheduleQueryUseCase::new(state.repo.clone(), state.config.clone())
        .schedule(
            &principal,
            ScheduleQuery {
                from: params.from,
                to: params.to,
            },
        )
        .await?;
    Ok(Json(schedule_to_view(output)))
}

/// GET /schedule/{id}
pub async fn get_reservation<R>(
    State(state): State<ScheduleAppState<R>>,
    principal: Principal,
    WithRejection(Path(id), _): WithRejection<Path<ReservationId>, ScheduleError>,
) -> ScheduleResult<Json<ReservationView>>
where
    R: ReservationRepository + Clone + Send + Sync + 'static,
{
    let reservation = ScheduleQueryUseCase::new(state.repo.clone(), state.config.clone())
        .get(&principal, id)
        .await?;
    Ok(Json(reservation_to_view(&reservation)))
}

/// POST /schedule
pub async fn make_reservation<R>(
    State(state): State<ScheduleAppState<R>>,
    principal: Principal,
    OriginalUri(uri): OriginalUri,
    WithRejection(Json(body), _): WithRejection<Json<ReservationRequest>, ScheduleError>,
) -> ScheduleResult<impl IntoResponse>
where
    R: ReservationRepository + Clone + Send + Sync + 'static,
{
    // Refuse before the dates are looked at
    policy::resolve_owner(&principal, body.owner_id)?;

    let draft = request_to_draft(body).map_err(ScheduleError::Validation)?;
    let reservation = ReservationCommandUseCase::new(state.repo.clone(), state.config.clone())
        .create(&principal, draft)
        .await?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, reservation_location(uri.path(), reservation.id)?)],
        Json(reservation_to_view(&reservation)),
    ))
}

/// PUT /schedule/{id}
///
/// Answers 201 with a Location header, like creation.
pub async fn update_reservation<R>(
    State(state): State<ScheduleAppState<R>>,
    principal: Principal,
    OriginalUri(uri): OriginalUri,
    WithRejection(Path(id), _): WithRejection<Path<ReservationId>, ScheduleError>,
    WithRejection(Json(body), _): WithRejection<Json<ReservationRequest>, ScheduleError>,
) -> ScheduleResult<impl IntoResponse>
where
    R: ReservationRepository + Clone + Send + Sync + 'static,
{
    policy::authorize_management(&principal)?;

    let draft = request_to_draft(body).map_err(ScheduleError::Validation)?;
    let reservation = ReservationCommandUseCase::new(state.repo.clone(), state.config.clone())
        .update(&principal, id, draft)
        .await?;

    // The request path already ends in the id
    let location = HeaderValue::from_str(uri.path())
        .map_err(|_| ScheduleError::Internal("Invalid Location header".into()))?;
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(reservation_to_view(&reservation)),
    ))
}

/// DELETE /schedule/{id}
pub async fn remove_reservation<R>(
    State(state): State<ScheduleAppState<R>>,
    principal: Principal,
    WithRejection(Path(id), _): WithRejection<Path<ReservationId>, ScheduleError>,
) -> ScheduleResult<Json<ReservationView>>
where
    R: ReservationRepository + Clone + Send + Sync + 'static,
{
    let removed = ReservationCommandUseCase::new(state.repo.clone(), state.config.clone())
        .delete(&principal, id)
        .await?;
    Ok(Json(reservation_to_view(&removed)))
}
