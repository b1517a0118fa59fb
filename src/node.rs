//! Node types that make up an error chain.
//!
//! Every node owns exactly one cause (or none, for leaves) and is immutable
//! once built. Chains are walked through [`core::error::Error::source`].

use core::error::Error as StdError;
use core::fmt;
use core::panic::Location;

use crate::stack::StackTrace;

/// Any caller-supplied error, boxed. `&str` and `String` convert into it too.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

// ============================================================================
// StackTracer - capability for nodes carrying a captured stack
// ============================================================================

/// Implemented by chain nodes that carry a captured [`StackTrace`].
///
/// [`WithStack`] is the only such node. Use [`stack_tracer`](crate::stack_tracer)
/// to query a whole chain for it.
pub trait StackTracer: StdError {
    /// The captured stack, innermost frame first.
    fn stack_trace(&self) -> &StackTrace;
}

// ============================================================================
// Message - plain text leaf
// ============================================================================

/// A leaf error holding only text. Built by [`new`](crate::new) and
/// [`errorf`](crate::errorf()).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Message(String);

impl Message {
    /// Create a leaf error from text.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The message text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl StdError for Message {}

// ============================================================================
// WithStack - error plus the one stack captured for its chain
// ============================================================================

/// An error paired with the stack captured where it was first annotated.
///
/// Its text is the wrapped error's text. With the `+` flag (`{:+}`) the
/// stack follows the text, one call site per block.
pub struct WithStack {
    error: BoxError,
    stack: StackTrace,
    location: &'static Location<'static>,
}

impl WithStack {
    pub(crate) fn new(
        error: BoxError,
        stack: StackTrace,
        location: &'static Location<'static>,
    ) -> Self {
        Self {
            error,
            stack,
            location,
        }
    }

    /// The error this node annotates.
    #[inline]
    pub fn error(&self) -> &(dyn StdError + Send + Sync + 'static) {
        &*self.error
    }

    /// Source location of the call that captured the stack.
    ///
    /// Exact even when the binary carries no debug info.
    #[inline]
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }
}

impl StackTracer for WithStack {
    #[inline]
    fn stack_trace(&self) -> &StackTrace {
        &self.stack
    }
}

impl fmt::Display for WithStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;
        if f.sign_plus() {
            write!(f, "{:+}", self.stack)?;
        }
        Ok(())
    }
}

impl fmt::Debug for WithStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WithStack")
            .field("error", &self.error)
            .field("location", &self.location)
            .field("stack", &self.stack)
            .finish()
    }
}

impl StdError for WithStack {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&*self.error)
    }
}

// ============================================================================
// Annotated - message layered onto a cause
// ============================================================================

/// A message prepended to a cause.
///
/// The text is joined once, when the node is built, as
/// `annotation: cause-text`. Formatting never re-walks the chain.
pub struct Annotated {
    message: String,
    annotation_len: usize,
    cause: BoxError,
}

impl Annotated {
    pub(crate) fn new(annotation: String, cause: BoxError) -> Self {
        let annotation_len = annotation.len();
        let mut message = annotation;
        message.push_str(": ");
        message.push_str(&cause.to_string());
        Self {
            message,
            annotation_len,
            cause,
        }
    }

    /// The full text, `annotation: cause-text`.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Only the text this node added.
    #[inline]
    pub fn annotation(&self) -> &str {
        &self.message[..self.annotation_len]
    }

    /// The annotated error.
    #[inline]
    pub fn cause(&self) -> &(dyn StdError + Send + Sync + 'static) {
        &*self.cause
    }
}

impl fmt::Display for Annotated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl fmt::Debug for Annotated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Annotated")
            .field("annotation", &self.annotation())
            .field("cause", &self.cause)
            .finish()
    }
}

impl StdError for Annotated {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&*self.cause)
    }
}
