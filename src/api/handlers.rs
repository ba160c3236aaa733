use axum::{
    extract::State,
    http::StatusCode,
    response::Html,
    Extension, Form, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
};

use super::AppState;

pub const DEFAULT_TITLE: &str = "The Prestige";
pub const DEFAULT_TOP: usize = 10;
pub const MIN_TOP: usize = 5;
pub const MAX_TOP: usize = 25;

/// Raw form fields; `top` is parsed by the handler so bad values get a JSON 400
#[derive(Debug, Deserialize)]
pub struct RecommendForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub top: String,
}

impl RecommendForm {
    /// Number of results to show, within `MIN_TOP..=MAX_TOP`
    pub fn top(&self) -> AppResult<usize> {
        self.top
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|top| (MIN_TOP..=MAX_TOP).contains(top))
            .ok_or_else(|| {
                AppError::InvalidInput(format!(
                    "Number of recommendations must be between {} and {}",
                    MIN_TOP, MAX_TOP
                ))
            })
    }
}

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Serves the search form
pub async fn index() -> Html<String> {
    Html(render_page(DEFAULT_TITLE, DEFAULT_TOP, None))
}

/// Runs one recommendation and shows its output verbatim
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Form(form): Form<RecommendForm>,
) -> AppResult<Html<String>> {
    let title = form.title.trim();
    if title.is_empty() {
        return Err(AppError::InvalidInput(
            "Movie title cannot be empty".to_string(),
        ));
    }
    let top = form.top()?;

    tracing::info!(
        request_id = %request_id,
        title = %title,
        top,
        "Running recommendation"
    );

    let output = state.runner.run(title, top).await?;

    tracing::info!(
        request_id = %request_id,
        output_bytes = output.len(),
        "Recommendation finished"
    );

    Ok(Html(render_page(title, top, Some(&output))))
}

/// Escapes text for HTML element and attribute content
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn render_page(title: &str, top: usize, output: Option<&str>) -> String {
    let result = output
        .map(|text| format!("<pre>{}</pre>", escape_html(text)))
        .unwrap_or_default();

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Movie Recommender</title>
</head>
<body>
<h1>Review-Vibe Movie Recommender</h1>
<form method="post" action="/recommend">
<label>Enter a movie title: <input type="text" name="title" value="{title}"></label>
<label>Number of recommendations: <input type="range" name="top" min="{min}" max="{max}" value="{top}" oninput="this.nextElementSibling.value = this.value"><output>{top}</output></label>
<button type="submit">Find Similar Movies</button>
</form>
{result}
</body>
</html>
"#,
        title = escape_html(title),
        min = MIN_TOP,
        max = MAX_TOP,
        top = top,
        result = result,
    )
}
