use axum::{
    Router, middleware,
    routing::{get, post},
};
use storage::Database;

use super::handlers::{aggregate_scores, get_leaderboard, get_overall_leaderboard, submit_score};
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    let protected = Router::new()
        .route("/events/:event_id/scores", post(submit_score))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/scores/aggregate", post(aggregate_scores))
        .route("/events/:event_id/leaderboard", get(get_leaderboard))
        .route("/competitions/:slug/leaderboard", get(get_overall_leaderboard))
        .merge(protected)
}
