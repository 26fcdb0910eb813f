//! Error and position types for parsing.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// Location of a token in the (normalized) source text.
///
/// `line` and `column` are 1-based; `offset` is the 0-based byte offset. The
/// optional file name is shared between all positions of one parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SourcePosition {
    pub file: Option<Arc<str>>,
    pub line: u32,
    pub column: u32,
    pub offset: usize,
}

impl SourcePosition {
    pub fn new(line: u32, column: u32, offset: usize) -> Self {
        Self {
            file: None,
            line,
            column,
            offset,
        }
    }

    /// Same position, attributed to `file`.
    pub fn with_file(mut self, file: Arc<str>) -> Self {
        self.file = Some(file);
        self
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{}:", file)?;
        }
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Errors that can occur while turning source text into an AST.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum FrontendError {
    /// The grammar rejected the input.
    #[error("syntax error at {position}: {message}")]
    Syntax {
        message: String,
        position: SourcePosition,
    },

    /// A grammar action was handed a product of the wrong kind. This is a
    /// mismatch between the grammar and its actions, never a user error.
    #[error("unexpected parser product for {context}: expected {expected}, got {actual}")]
    UnexpectedProduct {
        context: &'static str,
        expected: &'static str,
        actual: &'static str,
    },
}

impl FrontendError {
    pub(crate) fn unexpected(
        context: &'static str,
        expected: &'static str,
        actual: &'static str,
    ) -> Self {
        Self::UnexpectedProduct {
            context,
            expected,
            actual,
        }
    }

    /// Source position of a syntax error, if this is one.
    pub fn position(&self) -> Option<&SourcePosition> {
        match self {
            Self::Syntax { position, .. } => Some(position),
            _ => None,
        }
    }
}
