use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const DEFAULT_PAGE_LIMIT: u32 = 25;
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Value of the sorted column at a cursor position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum SortValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl From<i64> for SortValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<String> for SortValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for SortValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Position in a result set sorted by `(sort_value, id)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Cursor {
    pub sort_value: SortValue,
    pub id: String,
}

impl Cursor {
    pub fn new(sort_value: impl Into<SortValue>, id: impl Into<String>) -> Self {
        Self {
            sort_value: sort_value.into(),
            id: id.into(),
        }
    }
}

/// `Forward` walks towards smaller `(sort, id)` tuples, `Backward` towards larger ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaginationDirection {
    #[default]
    Forward,
    Backward,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CursorResponse<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
    pub prev_cursor: Option<String>,
    pub has_more: bool,
}
