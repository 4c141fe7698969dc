use axum::{
    Router, middleware,
    routing::{get, post},
};
use storage::Database;

use super::handlers::{calculate_fees, get_division_fees, get_revenue};
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    let protected = Router::new()
        .route("/competitions/:slug/revenue", get(get_revenue))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/fees/calculate", post(calculate_fees))
        .route("/competitions/:slug/fees/:division_id", get(get_division_fees))
        .merge(protected)
}
