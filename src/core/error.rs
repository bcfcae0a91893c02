use thiserror::Error;

/// Errors that can occur while loading or mapping a document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExtractError {
    /// The input is not well-formed XML.
    #[error("XML error: {0}")]
    Xml(String),

    /// Reading the input failed before parsing started.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No mapper is registered for the requested document kind.
    #[error("unknown document kind: {0}")]
    UnknownKind(String),
}

/// Errors raised while compiling a path expression.
///
/// The extraction combinators never surface these; they fold them into
/// absence. They are visible only through [`Node::select`](crate::xml::Node::select).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum PathError {
    /// The expression is not a supported location path.
    #[error("invalid path `{path}`: {message}")]
    Syntax {
        /// The offending expression.
        path: String,
        /// What went wrong.
        message: String,
    },

    /// A step uses a prefix the document never declares.
    #[error("unbound namespace prefix `{prefix}`")]
    UnboundPrefix {
        /// The prefix as written in the path.
        prefix: String,
    },

    /// The path was built from a namespace key with no binding in this document.
    #[error("path references an unresolved namespace")]
    Unresolved,
}

impl PathError {
    pub(crate) fn syntax(path: &str, message: impl Into<String>) -> Self {
        Self::Syntax {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            ExtractError::Xml("unexpected EOF".into()).to_string(),
            "XML error: unexpected EOF"
        );
        assert_eq!(
            PathError::UnboundPrefix { prefix: "cbc".into() }.to_string(),
            "unbound namespace prefix `cbc`"
        );
        assert_eq!(
            PathError::syntax("a//", "empty step").to_string(),
            "invalid path `a//`: empty step"
        );
    }
}
