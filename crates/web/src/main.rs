use std::time::Duration;

use anyhow::Context;
use axum::Router;
use storage::Database;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;
mod middleware;

use config::Config;
use features::{competitions, fees, schedule, scores};
use middleware::auth::ApiKeys;

#[derive(OpenApi)]
#[openapi(
    paths(
        competitions::handlers::list_competitions,
        competitions::handlers::get_competition,
        competitions::handlers::create_competition,
        competitions::handlers::update_competition,
        competitions::handlers::delete_competition,
        fees::handlers::calculate_fees,
        fees::handlers::get_division_fees,
        fees::handlers::get_revenue,
        schedule::handlers::get_schedule,
        schedule::handlers::get_schedule_days,
        schedule::handlers::generate_heats,
        scores::handlers::aggregate_scores,
        scores::handlers::submit_score,
        scores::handlers::get_leaderboard,
        scores::handlers::get_overall_leaderboard,
    ),
    components(
        schemas(
            storage::dto::competition::CreateCompetitionRequest,
            storage::dto::competition::UpdateCompetitionRequest,
            storage::dto::competition::CompetitionResponse,
            storage::dto::common::PaginationDirection,
            storage::dto::fees::CalculateFeesRequest,
            storage::dto::fees::FeeBreakdown,
            storage::dto::fees::RevenueStats,
            storage::dto::fees::DivisionRevenue,
            storage::dto::schedule::CompetitionScheduleResponse,
            storage::dto::schedule::EventScheduleResponse,
            storage::dto::schedule::ScheduleInfo,
            storage::dto::schedule::ScheduleDay,
            storage::dto::schedule::ScheduledHeat,
            storage::dto::schedule::VenueRef,
            storage::dto::schedule::DivisionRef,
            storage::dto::schedule::GenerateHeatsRequest,
            storage::dto::schedule::GeneratedHeatResponse,
            storage::dto::scores::ScoreType,
            storage::dto::scores::WorkoutScheme,
            storage::dto::scores::AggregateScoresRequest,
            storage::dto::scores::AggregationSummary,
            storage::dto::scores::SubmitScoreRequest,
            storage::dto::scores::ScoreResponse,
            storage::dto::scores::LeaderboardEntry,
            storage::dto::scores::ScoreStatus,
            storage::dto::scores::EventResult,
            storage::dto::scores::OverallLeaderboardEntry,
        )
    ),
    tags(
        (name = "competitions", description = "Competition management endpoints"),
        (name = "fees", description = "Registration pricing and revenue endpoints"),
        (name = "schedule", description = "Heat schedule endpoints"),
        (name = "scores", description = "Score aggregation and leaderboard endpoints"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .build(),
                ),
            )
        }
    }
}

fn app(db: Database, api_keys: ApiKeys) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));

    let api = Router::new()
        .merge(competitions::routes::routes(api_keys.clone()))
        .merge(fees::routes::routes(api_keys.clone()))
        .merge(schedule::routes::routes(api_keys.clone()))
        .merge(scores::routes::routes(api_keys));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api)
        .layer(cors)
        .with_state(db)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting WODsmith Compete API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let api_keys = ApiKeys::from_comma_separated(&config.api_keys);
    if api_keys.is_empty() {
        tracing::warn!("No API keys configured, admin endpoints will reject every request");
    } else {
        tracing::info!("Loaded {} API key(s)", api_keys.len());
    }

    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    axum::serve(listener, app(db, api_keys))
        .await
        .context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;
    use uuid::Uuid;

    const API_KEY: &str = "test-key";

    fn test_app() -> Router {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/wodsmith_test")
            .unwrap();
        app(
            Database::from_pool(pool),
            ApiKeys::from_comma_separated(API_KEY),
        )
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_calculate_fees_passed_to_customer() {
        let response = test_app()
            .oneshot(post_json(
                "/api/fees/calculate",
                json!({ "registration_fee_cents": 5000, "platform_fee_percent": "2.5" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["platform_fee_cents"], 125);
        assert_eq!(body["total_charge_cents"], 5309);
        assert_eq!(body["organizer_net_cents"], 4875);
        assert_eq!(body["stripe_fees_passed_to_customer"], true);
    }

    #[tokio::test]
    async fn test_calculate_fees_rejects_negative_fee() {
        let response = test_app()
            .oneshot(post_json(
                "/api/fees/calculate",
                json!({ "registration_fee_cents": -1, "platform_fee_percent": "2.5" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Validation failed");
    }

    #[tokio::test]
    async fn test_aggregate_scores_uses_scheme_default() {
        let response = test_app()
            .oneshot(post_json(
                "/api/scores/aggregate",
                json!({ "values": [312, 298, 305], "scheme": "time" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["aggregated"], 298);
        assert_eq!(body["operation"], "min");
        assert_eq!(body["count"], 3);
    }

    #[tokio::test]
    async fn test_aggregate_empty_values_is_null() {
        let response = test_app()
            .oneshot(post_json(
                "/api/scores/aggregate",
                json!({ "values": [], "score_type": "average" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["aggregated"].is_null());
        assert_eq!(body["count"], 0);
    }

    #[tokio::test]
    async fn test_admin_route_requires_api_key() {
        let uri = format!("/api/events/{}/scores", Uuid::new_v4());
        let body = json!({ "registration_id": Uuid::new_v4(), "attempts": [100] });

        let response = test_app()
            .oneshot(post_json(&uri, body.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let mut request = post_json(&uri, body);
        request.headers_mut().insert(
            header::AUTHORIZATION,
            "Bearer wrong-key".parse().unwrap(),
        );
        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_generate_heats_validates_before_touching_database() {
        let mut request = post_json(
            &format!("/api/events/{}/heats/generate", Uuid::new_v4()),
            json!({
                "venue_id": Uuid::new_v4(),
                "start_time": "2025-03-01T14:00:00Z",
                "heat_duration_minutes": 0
            }),
        );
        request.headers_mut().insert(
            header::AUTHORIZATION,
            format!("Bearer {}", API_KEY).parse().unwrap(),
        );

        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_leaderboard_rejects_out_of_range_limit() {
        let request = Request::builder()
            .uri(format!("/api/events/{}/leaderboard?limit=0", Uuid::new_v4()))
            .body(Body::empty())
            .unwrap();

        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_competition_rejects_reversed_dates() {
        let mut request = post_json(
            "/api/competitions",
            json!({
                "name": "Winter Throwdown",
                "slug": "winter-throwdown-2025",
                "start_date": "2025-01-19",
                "end_date": "2025-01-18"
            }),
        );
        request.headers_mut().insert(
            header::AUTHORIZATION,
            format!("Bearer {}", API_KEY).parse().unwrap(),
        );

        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let request = Request::builder()
            .uri("/api-docs/openapi.json")
            .body(Body::empty())
            .unwrap();

        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["paths"]["/api/events/{event_id}/leaderboard"].is_object());
        assert!(body["paths"]["/api/competitions/{slug}/leaderboard"].is_object());
    }

    #[tokio::test]
    async fn test_scored_result_without_attempts_is_rejected() {
        let mut request = post_json(
            &format!("/api/events/{}/scores", Uuid::new_v4()),
            json!({ "registration_id": Uuid::new_v4(), "attempts": [], "status": "scored" }),
        );
        request.headers_mut().insert(
            header::AUTHORIZATION,
            format!("Bearer {}", API_KEY).parse().unwrap(),
        );

        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
