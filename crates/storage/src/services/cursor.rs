use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use sqlx::{Postgres, QueryBuilder};

use crate::dto::common::{Cursor, CursorResponse, PaginationDirection, SortValue};

/// Rows that can be addressed by a cursor expose their tie-break id
pub trait CursorItem {
    fn cursor_id(&self) -> String;
}

pub fn encode_cursor(cursor: &Cursor) -> String {
    // Cursor has only string keys and plain values, so serialization is infallible
    let json = serde_json::to_vec(cursor).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json)
}

/// Returns `None` for any malformed or tampered token, callers treat it as the first page
pub fn decode_cursor(token: &str) -> Option<Cursor> {
    let bytes = URL_SAFE_NO_PAD.decode(token.trim_end_matches('=')).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Tuple comparison `(sort_column, id_column) <op> (sort_value, id)`
#[derive(Debug, Clone, PartialEq)]
pub struct CursorPredicate {
    pub sort_column: &'static str,
    pub id_column: &'static str,
    /// SQL type the bound id is cast to, so a typed id column keeps its index
    pub id_cast: Option<&'static str>,
    pub direction: PaginationDirection,
    pub cursor: Cursor,
}

impl CursorPredicate {
    pub fn operator(&self) -> &'static str {
        match self.direction {
            PaginationDirection::Forward => "<",
            PaginationDirection::Backward => ">",
        }
    }

    pub fn cast_id(mut self, sql_type: &'static str) -> Self {
        self.id_cast = Some(sql_type);
        self
    }

    /// Append the predicate with its values bound as parameters
    pub fn push_to(&self, query: &mut QueryBuilder<'_, Postgres>) {
        query.push("(");
        query.push(self.sort_column);
        query.push(", ");
        query.push(self.id_column);
        query.push(") ");
        query.push(self.operator());
        query.push(" (");
        match &self.cursor.sort_value {
            SortValue::Integer(value) => query.push_bind(*value),
            SortValue::Float(value) => query.push_bind(*value),
            SortValue::Text(value) => query.push_bind(value.clone()),
        };
        query.push(", ");
        query.push_bind(self.cursor.id.clone());
        if let Some(sql_type) = self.id_cast {
            query.push("::");
            query.push(sql_type);
        }
        query.push(")");
    }
}

/// Build the paging predicate, or `None` on the first page.
///
/// Column names are spliced into SQL verbatim, hence `&'static str`.
pub fn build_cursor_where(
    sort_column: &'static str,
    id_column: &'static str,
    cursor: Option<&Cursor>,
    direction: PaginationDirection,
) -> Option<CursorPredicate> {
    cursor.map(|cursor| CursorPredicate {
        sort_column,
        id_column,
        id_cast: None,
        direction,
        cursor: cursor.clone(),
    })
}

/// Shape a `limit + 1` fetch into a page.
///
/// `next_cursor` is only set when another page exists; `prev_cursor` points at
/// the first item returned.
pub fn create_cursor_response<T, F>(
    mut items: Vec<T>,
    limit: usize,
    get_sort_value: F,
) -> CursorResponse<T>
where
    T: CursorItem,
    F: Fn(&T) -> SortValue,
{
    let has_more = items.len() > limit;
    items.truncate(limit);

    let cursor_of = |item: &T| encode_cursor(&Cursor::new(get_sort_value(item), item.cursor_id()));

    let next_cursor = if has_more {
        items.last().map(cursor_of)
    } else {
        None
    };
    let prev_cursor = items.first().map(cursor_of);

    CursorResponse {
        items,
        next_cursor,
        prev_cursor,
        has_more,
    }
}
