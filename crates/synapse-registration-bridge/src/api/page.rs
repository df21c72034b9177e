//! The registration page template.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use handlebars::{Handlebars, RenderError, TemplateError};
use serde_json::json;
use tracing::error;

/// Notice shown after a successful registration.
pub const REGISTERED_NOTICE: &str = "You're registered!";

/// Notice shown when the posted body is not a readable form.
pub const INVALID_FORM_NOTICE: &str = "Invalid form submission";

const PAGE_NAME: &str = "page";

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
	<title>Synapse Registration</title>
</head>
<body>
<h1>Synapse Registration</h1>
{{#if notice}}
	<h2>{{notice}}</h2>
{{/if}}

	<br>
	<form method="POST">
		Username: <br>
		<input type="text" name="Username" /><br>
		Password: <br>
		<input type="password" name="Password" /><br>
		<input type="submit" name="Submit" />
	</form>

</body>
</html>
"#;

/// Compiled registration page. Notices are HTML-escaped on render.
pub struct Page {
    registry: Handlebars<'static>,
}

impl Page {
    /// Compile the page template.
    pub fn new() -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();
        registry.register_template_string(PAGE_NAME, PAGE_TEMPLATE)?;
        Ok(Self { registry })
    }

    /// Render the page with an optional notice.
    pub fn render(&self, notice: Option<&str>) -> Result<String, RenderError> {
        self.registry
            .render(PAGE_NAME, &json!({ "notice": notice }))
    }

    /// Render the page into a response with `status`.
    ///
    /// A render failure is logged here and answered with a bare 500.
    pub fn respond(&self, status: StatusCode, notice: Option<&str>) -> Response {
        match self.render(notice) {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => {
                error!(error = %e, "Failed to render registration page");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}
