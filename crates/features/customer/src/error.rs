use chub_database::DatabaseError;
use chub_kernel::validation::FieldViolation;
use std::borrow::Cow;

/// Errors raised by the customer slice.
#[chub_derive::chub_error]
pub enum CustomerError {
    /// Payload fields failed validation.
    #[error(
        "Validation failed{}: {} field(s) rejected",
        format_context(.context),
        .violations.len()
    )]
    Validation { violations: Vec<FieldViolation>, context: Option<Cow<'static, str>> },

    /// Request could not be read (malformed JSON, non-numeric id).
    #[error("Bad request{}: {message}", format_context(.context))]
    BadRequest { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Unsupported media type{}: {message}", format_context(.context))]
    UnsupportedMediaType { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A requested customer does not exist.
    #[error("Customer not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The store holds no customers.
    #[error("No data{}: {message}", format_context(.context))]
    NoData { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A customer with the same id or email is already stored.
    #[error("Customer conflict{}: {message}", format_context(.context))]
    Conflict { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Customer store error{}: {source}", format_context(.context))]
    Database {
        #[source]
        source: DatabaseError,
        context: Option<Cow<'static, str>>,
    },

    #[cfg(feature = "server")]
    #[error("Application state error{}: {source}", format_context(.context))]
    State {
        #[source]
        source: chub_kernel::server::ApiStateError,
        context: Option<Cow<'static, str>>,
    },

    #[error("Internal customer error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[cfg(feature = "server")]
mod response {
    use super::CustomerError;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use chub_kernel::server::ErrorBody;
    use tracing::{error, warn};

    impl CustomerError {
        #[must_use]
        pub fn status(&self) -> StatusCode {
            match self {
                Self::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
                Self::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                Self::NotFound { .. } | Self::NoData { .. } => StatusCode::NOT_FOUND,
                Self::Conflict { .. } => StatusCode::CONFLICT,
                Self::Database { .. } | Self::State { .. } | Self::Internal { .. } => {
                    StatusCode::INTERNAL_SERVER_ERROR
                },
            }
        }
    }

    impl IntoResponse for CustomerError {
        fn into_response(self) -> Response {
            let status = self.status();
            let body = match self {
                Self::Validation { violations, .. } => {
                    warn!(violations = violations.len(), "Customer payload rejected");
                    ErrorBody::new(status, "Validation failed").with_violations(violations)
                },
                Self::BadRequest { message, .. }
                | Self::UnsupportedMediaType { message, .. }
                | Self::NotFound { message, .. }
                | Self::NoData { message, .. }
                | Self::Conflict { message, .. } => ErrorBody::new(status, message),
                err @ (Self::Database { .. } | Self::State { .. } | Self::Internal { .. }) => {
                    error!(error = %err, "Customer request failed");
                    ErrorBody::new(status, "Internal server error")
                },
            };
            body.into_response()
        }
    }
}
