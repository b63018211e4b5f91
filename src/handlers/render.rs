use axum::Json;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{RenderDto, RenderRequest};
use crate::output::{preview_lines, to_plain_text};
use crate::template::{extract_variables, render};

/// POST /render
///
/// Renders `template` against `record`. Called on every edit, so it does
/// no I/O and keeps no state between calls.
pub async fn render_template(Json(req): Json<RenderRequest>) -> AppResult<Json<RenderDto>> {
    req.validate()?;

    let template = req.template.trim();
    if template.is_empty() {
        return Err(AppError::Validation("Template is empty".into()));
    }

    let rendered = render(template, &req.record);
    let lines = preview_lines(&rendered)
        .into_iter()
        .map(str::to_string)
        .collect();
    let plain_text = to_plain_text(&rendered);

    Ok(Json(RenderDto {
        variables: extract_variables(template),
        lines,
        plain_text,
        rendered,
    }))
}
