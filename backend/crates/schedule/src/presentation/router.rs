//! Schedule Router

use axum::{Router, routing::get};
use std::sync::Arc;

use crate::application::config::ScheduleConfig;
use crate::domain::repository::ReservationRepository;
use crate::infra::postgres::PgScheduleRepository;
use crate::presentation::handlers::{self, ScheduleAppState};

/// Create the Schedule router with PostgreSQL repository
pub fn schedule_router(repo: PgScheduleRepository, config: ScheduleConfig) -> Router {
    schedule_router_generic(repo, config)
}

/// Create a generic Schedule router for any repository implementation
pub fn schedule_router_generic<R>(repo: R, config: ScheduleConfig) -> Router
where
    R: ReservationRepository + Clone + Send + Sync + 'static,
{
    let state = ScheduleAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
    };

    Router::new()
        .route(
            "/",
            get(handlers::get_schedule::<R>).post(handlers::make_reservation::<R>),
        )
        .route(
            "/{id}",
            get(handlers::get_reservation::<R>)
                .put(handlers::update_reservation::<R>)
                .delete(handlers::remove_reservation::<R>),
        )
        .with_state(state)
}
