use std::error::Error as StdError;
use std::fmt;
use std::path::PathBuf;

use tracing_error::{SpanTrace, SpanTraceStatus};

/* 📖 # Why a custom error type and not anyhow/thiserror?

- Full control over how errors are rendered in logs and HTTP 599 bodies
- Context stack and cause chain without extra dependencies
- Span traces are captured where the error is created, not where it is printed
 */

/// Error variants that can occur in giftdocs operations.
#[derive(Debug)]
pub enum ErrorKind {
    /// File system operation failed
    FileError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Multiple errors occurred during batch operations
    Multiple {
        errors: Vec<GiftDocsError>,
        count: usize,
    },

    /// Catch-all for other errors with a message
    Message { message: String },
}

/* 📖 # Why separate ErrorKind and GiftDocsError?

ErrorKind holds the structural variant, so callers can match on it.
GiftDocsError adds what accumulates during propagation: context strings,
an optional cause and the span trace.
*/

/// Error type with context stack, optional cause and captured span trace.
pub struct GiftDocsError {
    kind: ErrorKind,
    context: Vec<String>,
    cause: Option<Box<GiftDocsError>>,
    span_trace: SpanTrace,
}

impl GiftDocsError {
    /// Creates a new error from an ErrorKind, capturing the current span trace.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: vec![],
            cause: None,
            span_trace: SpanTrace::capture(),
        }
    }

    /// Creates a plain message error.
    pub fn message(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Message {
            message: message.into(),
        })
    }

    /// Creates a file error for the given path.
    pub fn file_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::new(ErrorKind::FileError {
            path: path.into(),
            source,
        })
    }

    /// Attaches context to an error.
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Attaches context using lazy evaluation.
    pub fn with_context<F>(mut self, f: F) -> Self
    where
        F: FnOnce() -> String,
    {
        self.context.push(f());
        self
    }

    /// Records the error that caused this one.
    pub fn caused_by(mut self, cause: GiftDocsError) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Context entries, oldest first.
    pub fn get_context(&self) -> &[String] {
        &self.context
    }

    /// The error that caused this one, if any.
    pub fn cause(&self) -> Option<&GiftDocsError> {
        self.cause.as_deref()
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Returns the innermost error in the source chain.
    pub fn root_cause(&self) -> &(dyn StdError + 'static) {
        let mut current: &(dyn StdError + 'static) = self;
        while let Some(next) = current.source() {
            current = next;
        }
        current
    }

    fn write_kind(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::FileError { path, source } => {
                write!(f, "File error at {}: {}", path.display(), source)
            }
            ErrorKind::Multiple { errors, count } => {
                write!(f, "Multiple errors occurred ({} total)", count)?;
                if let Some(first) = errors.first() {
                    write!(f, ": {}", first)?;
                }
                Ok(())
            }
            ErrorKind::Message { message } => write!(f, "{}", message),
        }
    }

    fn write_tree(&self, f: &mut fmt::Formatter<'_>, indent: &str) -> fmt::Result {
        self.write_kind(f)?;
        writeln!(f)?;
        let entries = self.context.len() + usize::from(self.cause.is_some());
        for (i, ctx) in self.context.iter().enumerate() {
            let branch = if i + 1 == entries { "└─" } else { "├─" };
            writeln!(f, "{}{} {}", indent, branch, ctx)?;
        }
        if let Some(cause) = &self.cause {
            write!(f, "{}└─ cause: ", indent)?;
            cause.write_tree(f, &format!("{}   ", indent))?;
        }
        Ok(())
    }
}

impl From<ErrorKind> for GiftDocsError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl StdError for GiftDocsError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        if let Some(cause) = &self.cause {
            return Some(cause.as_ref());
        }
        match &self.kind {
            ErrorKind::FileError { source, .. } => Some(source),
            ErrorKind::Multiple { errors, .. } => errors.first().and_then(|e| e.source()),
            ErrorKind::Message { .. } => None,
        }
    }
}

impl fmt::Display for GiftDocsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ctx in &self.context {
            write!(f, "{}: ", ctx)?;
        }
        self.write_kind(f)
    }
}

impl fmt::Debug for GiftDocsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f, "")?;
        if self.span_trace.status() == SpanTraceStatus::CAPTURED {
            writeln!(f, "Trace: {}", self.span_trace)?;
        }
        Ok(())
    }
}

/* 📖 # Why Box<GiftDocsError> in the result type?

The error carries a Vec, an optional cause and a span trace. Boxing keeps
the Ok path of every result small.
*/

/// Standard result type for giftdocs operations.
pub type GiftDocsResult<T> = Result<T, Box<GiftDocsError>>;

/// Extension trait for attaching context to results during propagation.
pub trait ResultExt<T> {
    /// Attaches context to an error, evaluated eagerly.
    fn context(self, context: impl Into<String>) -> GiftDocsResult<T>;

    /// Attaches context, evaluated only on the error path.
    fn with_context<F>(self, f: F) -> GiftDocsResult<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for GiftDocsResult<T> {
    fn context(self, context: impl Into<String>) -> GiftDocsResult<T> {
        self.map_err(|err| Box::new(err.context(context)))
    }

    fn with_context<F>(self, f: F) -> GiftDocsResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|err| Box::new(err.with_context(f)))
    }
}

/// Creates a boxed message error from a format string.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        Box::new($crate::GiftDocsError::message(format!($($arg)*)))
    };
}

/// Returns early with a boxed message error.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::err!($($arg)*))
    };
}
