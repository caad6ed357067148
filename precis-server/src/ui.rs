//! Browser form served at `/`. The page only ever talks to this server's
//! `/api/summarize`; the Gemini credential stays server-side.

use axum::response::Html;

pub const INDEX_HTML: &str = include_str!("../static/index.html");

pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}
