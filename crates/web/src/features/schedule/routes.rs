use axum::{
    Router, middleware,
    routing::{get, post},
};
use storage::Database;

use super::handlers::{generate_heats, get_schedule, get_schedule_days};
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    let protected = Router::new()
        .route("/events/:event_id/heats/generate", post(generate_heats))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/competitions/:slug/schedule", get(get_schedule))
        .route("/competitions/:slug/schedule/days", get(get_schedule_days))
        .merge(protected)
}
