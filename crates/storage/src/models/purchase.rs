use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

pub const PURCHASE_STATUS_COMPLETED: &str = "completed";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CommercePurchase {
    pub purchase_id: Uuid,
    pub competition_id: Uuid,
    pub division_id: Option<Uuid>,
    pub status: String,
    pub total_cents: i64,
    pub platform_fee_cents: i64,
    pub stripe_fee_cents: i64,
    pub organizer_net_cents: i64,
    pub created_at: chrono::NaiveDateTime,
}
