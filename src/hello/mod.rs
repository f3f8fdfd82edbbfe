//! Tutorial "hello world" API.
//!
//! ```text
//! GET /                     → {"Hello": "LLMs of the world using uvicorn"}
//! GET /items/{item_id}?q=.. → {"item_id": <int>, "q": <text|null>}
//! ```
//!
//! A path segment that is not an integer is answered with 422 and a
//! `{"detail": [...]}` list naming the offending location.

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::trace::TraceLayer;

pub const GREETING: &str = "LLMs of the world using uvicorn";

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Greeting {
    #[serde(rename = "Hello")]
    pub hello: String,
}

#[derive(Debug, Deserialize)]
pub struct ItemQuery {
    pub q: Option<String>,
}

/// Item echo. Ids beyond the 64-bit range are accepted up to `i128`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub item_id: i128,
    pub q: Option<String>,
}

/// A path parameter that failed integer parsing.
#[derive(Debug)]
pub struct InvalidItemId(pub String);

impl IntoResponse for InvalidItemId {
    fn into_response(self) -> Response {
        let detail = json!([{
            "type": "int_parsing",
            "loc": ["path", "item_id"],
            "msg": "Input should be a valid integer, unable to parse string as an integer",
            "input": self.0,
        }]);
        (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "detail": detail }))).into_response()
    }
}

pub async fn read_root() -> Json<Greeting> {
    Json(Greeting {
        hello: GREETING.to_string(),
    })
}

pub async fn read_item(
    Path(raw_id): Path<String>,
    Query(query): Query<ItemQuery>,
) -> Result<Json<Item>, InvalidItemId> {
    let item_id = raw_id.parse::<i128>().map_err(|_| InvalidItemId(raw_id))?;
    Ok(Json(Item { item_id, q: query.q }))
}

pub fn setup_hello_router() -> Router {
    Router::new()
        .route("/", get(read_root))
        .route("/items/{item_id}", get(read_item))
        .layer(TraceLayer::new_for_http())
}
