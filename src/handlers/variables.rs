use axum::Json;
use serde::Serialize;

use crate::catalog::{
    available_variables, ExampleTemplate, Variable, DEFAULT_TEMPLATE, EXAMPLE_TEMPLATES,
};

#[derive(Debug, Serialize)]
pub struct TemplatesDto {
    pub default: &'static str,
    pub examples: &'static [ExampleTemplate],
}

/// GET /variables
pub async fn list_variables() -> Json<&'static [Variable]> {
    Json(available_variables())
}

/// GET /templates
///
/// The default template and the ready-made examples.
pub async fn list_templates() -> Json<TemplatesDto> {
    Json(TemplatesDto {
        default: DEFAULT_TEMPLATE,
        examples: EXAMPLE_TEMPLATES,
    })
}
