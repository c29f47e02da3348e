use miette::Diagnostic;
use thiserror::Error;

/// Errors raised while building, rendering or updating form fields.
#[derive(Debug, Error, Diagnostic)]
pub enum FormError {
    /// A required field attribute is missing or points at nothing.
    #[error("field `{field}` is misconfigured: {message}")]
    #[diagnostic(code(form::configuration))]
    Configuration { field: String, message: String },

    /// A state payload did not have the expected shape.
    #[error("state payload is not in a valid format: {message}")]
    #[diagnostic(
        code(form::format),
        help("expected an object with optional `value`, `properties` and `attributes` keys")
    )]
    Format { message: String },

    /// A field could not be built from its backing element.
    #[error("cannot construct field: {0}")]
    #[diagnostic(code(form::construction))]
    Construction(String),

    /// The page rejected a DOM operation.
    #[error("dom operation failed: {0}")]
    #[diagnostic(code(form::dom))]
    Dom(String),

    #[error(transparent)]
    #[diagnostic(code(form::render))]
    Render(#[from] std::fmt::Error),
}

impl FormError {
    pub fn configuration(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for FormError {
    fn from(err: serde_json::Error) -> Self {
        Self::format(err.to_string())
    }
}
