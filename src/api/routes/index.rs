//! Page Route
//!
//! - GET / - Single-page shell

use axum::{extract::State, response::Html};
use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::storage::schema;

const INDEX_HTML: &str = include_str!("../../../static/index.html");

/// GET /
///
/// Creates any missing tables (and the default player) before serving the page.
pub async fn index(State(state): State<Arc<AppState>>) -> ApiResult<Html<&'static str>> {
    state.db.write(|tx| schema::create_all(tx)).await?;
    Ok(Html(INDEX_HTML))
}
