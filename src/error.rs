//! The [`Error`] handle returned by every annotation operation.
//!
//! This module also holds the dual-mode formatter: `{}` prints the message,
//! `{:+}` adds the captured stack, `{:?}` prints the message quoted.

use core::error::Error as StdError;
use core::fmt;
use core::panic::Location;

use crate::chain::{self, Chain};
use crate::node::{Annotated, BoxError, WithStack};
use crate::stack::StackTrace;

// ============================================================================
// Error - handle type
// ============================================================================

/// An annotated error.
///
/// Built by [`new`](crate::new), [`errorf`](crate::errorf()),
/// [`ensure_stack`](crate::ensure_stack), [`wrap`](crate::wrap),
/// [`wrapf`](crate::wrapf()), [`with_message`](crate::with_message) and the
/// [`ResultExt`](crate::ResultExt) methods. Each one owns the error it was
/// built from, reachable through [`source()`](core::error::Error::source).
///
/// ## Formatting
///
/// | Format  | Output |
/// |---------|--------|
/// | `{}`    | Message text, causes already joined in: `outer: inner: root` |
/// | `{:+}`  | Message text, then the chain's stack trace |
/// | `{:?}`  | Message text as a quoted, escaped string |
///
/// Errors built by `with_message` never force a stack, and print the same
/// for `{}` and `{:+}`.
///
/// ```rust
/// use causeway::{new, wrap};
///
/// let err = wrap(Some(new("disk full")), "read config").unwrap();
/// assert_eq!(format!("{}", err), "read config: disk full");
/// assert_eq!(format!("{:?}", err), "\"read config: disk full\"");
/// assert!(format!("{:+}", err).starts_with("read config: disk full\n"));
/// ```
pub struct Error {
    repr: Repr,
}

enum Repr {
    /// Subtree already checked for a stack; renders in dual mode.
    Formatted(BoxError),
    /// Message-only annotation.
    Annotated(Annotated),
}

impl Error {
    #[inline]
    pub(crate) fn formatted(inner: BoxError) -> Self {
        Self {
            repr: Repr::Formatted(inner),
        }
    }

    #[inline]
    pub(crate) fn annotated(node: Annotated) -> Self {
        Self {
            repr: Repr::Annotated(node),
        }
    }

    /// Wrap `error`, attaching `stack` if one was captured for it.
    ///
    /// `None` means the chain already carries a stack and is reused as is.
    pub(crate) fn stacked(
        error: BoxError,
        stack: Option<StackTrace>,
        location: &'static Location<'static>,
    ) -> Self {
        match stack {
            Some(stack) => Self::formatted(Box::new(WithStack::new(error, stack, location))),
            None => {
                tracing::trace!("cause chain already carries a stack trace, reusing it");
                Self::formatted(error)
            }
        }
    }

    /// Prepend `annotation` to this error's text, keeping dual-mode formatting.
    pub(crate) fn wrapped_in(self, annotation: String) -> Self {
        Self::formatted(Box::new(Annotated::new(annotation, Box::new(self))))
    }

    /// True unless this error came from a message-only annotation.
    #[inline]
    pub fn is_formatted(&self) -> bool {
        matches!(self.repr, Repr::Formatted(_))
    }

    /// The diagnostic root cause. See [`cause`](crate::cause).
    pub fn cause(&self) -> &(dyn StdError + 'static) {
        chain::cause(self)
    }

    /// The leaf of the chain, the error nothing else wraps.
    pub fn root(&self) -> &(dyn StdError + 'static) {
        chain::root(self)
    }

    /// The stack trace carried by the chain, if any.
    pub fn stack_trace(&self) -> Option<&StackTrace> {
        chain::stack_trace(self)
    }

    /// Iterate over this error and all of its causes, outermost first.
    pub fn chain(&self) -> Chain<'_> {
        chain::chain(self)
    }

    /// The first node in the chain of concrete type `T`.
    ///
    /// ```rust
    /// use std::io;
    ///
    /// let io_err = io::Error::new(io::ErrorKind::NotFound, "no such file");
    /// let err = causeway::wrap(Some(io_err), "open config").unwrap();
    /// let original = err.find::<io::Error>().unwrap();
    /// assert_eq!(original.kind(), io::ErrorKind::NotFound);
    /// ```
    pub fn find<T: StdError + 'static>(&self) -> Option<&T> {
        chain::find(self)
    }

    /// Format just the message text (same as `{}`).
    pub fn short(&self) -> impl fmt::Display + '_ {
        ShortDisplay { error: self }
    }

    /// Format the message text followed by the stack trace (same as `{:+}`).
    pub fn extended(&self) -> impl fmt::Display + '_ {
        ExtendedDisplay { error: self }
    }

    /// Format the message text quoted and escaped (same as `{:?}`).
    pub fn quoted(&self) -> impl fmt::Display + '_ {
        QuotedDisplay { error: self }
    }
}

// ============================================================================
// Dual-mode formatting
// ============================================================================

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::Formatted(inner) => {
                write!(f, "{}", inner)?;
                if f.sign_plus() {
                    if let Some(stack) = chain::stack_trace(&**inner) {
                        write!(f, "{:+}", stack)?;
                    }
                }
                Ok(())
            }
            Repr::Annotated(node) => f.write_str(node.message()),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.short().to_string();
        fmt::Debug::fmt(text.as_str(), f)
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match &self.repr {
            Repr::Formatted(inner) => Some(&**inner),
            Repr::Annotated(node) => Some(node.cause()),
        }
    }
}

/// Formatter that shows just the message.
struct ShortDisplay<'a> {
    error: &'a Error,
}

impl fmt::Display for ShortDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

/// Formatter that shows the message and the stack trace.
struct ExtendedDisplay<'a> {
    error: &'a Error,
}

impl fmt::Display for ExtendedDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}", self.error)
    }
}

/// Formatter that shows the message as a quoted string.
struct QuotedDisplay<'a> {
    error: &'a Error,
}

impl fmt::Display for QuotedDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.error)
    }
}
