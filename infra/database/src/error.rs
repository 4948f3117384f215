use std::borrow::Cow;

/// Failures of the customer store and its migrations.
#[chub_derive::chub_error]
pub enum DatabaseError {
    /// The builder was finalized without url, namespace or database.
    #[error("Invalid database settings{}: {message}", format_context(.context))]
    Settings { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The engine could not be started, stayed unhealthy, or refused the credentials.
    #[error("Database unavailable{}: {message}", format_context(.context))]
    Unavailable { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A write collided with a `UNIQUE` index.
    #[error("Duplicate value for index `{index}`{}", format_context(.context))]
    Duplicate { index: String, context: Option<Cow<'static, str>> },

    #[error("SurrealDB error{}: {source}", format_context(.context))]
    Surreal {
        #[source]
        source: surrealdb::Error,
        context: Option<Cow<'static, str>>,
    },

    /// Malformed migration or checksum drift.
    #[error("Migration error{}: {message}", format_context(.context))]
    Migration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal database error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl DatabaseError {
    /// Wraps an engine error, recognising unique index violations.
    pub fn from_engine(source: surrealdb::Error, context: impl Into<Cow<'static, str>>) -> Self {
        let context = Some(context.into());
        match unique_index_violation(&source.to_string()) {
            Some(index) => Self::Duplicate { index, context },
            None => Self::Surreal { source, context },
        }
    }

    /// Name of the violated index for [`DatabaseError::Duplicate`].
    #[must_use]
    pub fn duplicate_index(&self) -> Option<&str> {
        match self {
            Self::Duplicate { index, .. } => Some(index),
            _ => None,
        }
    }
}

// Engine message: "Database index `name` already contains <value>, with record `<id>`".
fn unique_index_violation(message: &str) -> Option<String> {
    if !message.contains("already contains") {
        return None;
    }
    let (_, rest) = message.split_once("index ")?;
    let name = rest.split_whitespace().next()?.trim_matches('`');
    (!name.is_empty()).then(|| name.to_owned())
}
