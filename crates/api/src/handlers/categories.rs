//! Handlers for the category catalogue.

use axum::response::IntoResponse;
use axum::Json;

use naturelog_core::category::ALL_CATEGORIES;

use crate::error::AppResult;
use crate::response::DataResponse;

/// GET /api/v1/categories
///
/// List the fixed set of entry categories, in display order.
pub async fn list_categories() -> AppResult<impl IntoResponse> {
    let names: Vec<&'static str> = ALL_CATEGORIES.iter().map(|c| c.as_str()).collect();
    Ok(Json(DataResponse { data: names }))
}
