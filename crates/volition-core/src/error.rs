use thiserror::Error;

use crate::tag::Tag;

/// Configuration problems surfaced at registration or update time.
///
/// None of these abort an update: the offending item is logged and skipped,
/// and evaluation continues with whatever remains valid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid tag `{0}`")]
    InvalidTag(String),

    #[error("no {kind} provider registered for tag `{tag}`")]
    UnknownProvider { kind: &'static str, tag: Tag },

    #[error("action `{action}` has more than one query producing {element}, ignoring `{query}`")]
    DuplicateQueryElement {
        action: Tag,
        element: String,
        query: Tag,
    },

    #[error("no action class registered for tag `{0}`")]
    NoActionClass(Tag),
}
