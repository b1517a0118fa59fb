//! # causeway - annotate errors, keep the cause, capture the stack once
//!
//! Attach context to an error as it travels up the call stack without losing
//! the original error, then get both the original error and the stack trace of
//! where things first went wrong.
//!
//! ```text
//! startup failed: read config: disk full
//! app::config::load
//! 	/src/app/config.rs:42
//! app::startup
//! 	/src/app/main.rs:17
//! ```
//!
//! ## Try It Now
//!
//! ```rust
//! use causeway::{new, wrap};
//!
//! let e0 = new("disk full");                        // stack captured here
//! let e1 = wrap(Some(e0), "read config");            // no second capture
//! let e2 = wrap(e1, "startup failed").unwrap();
//!
//! assert_eq!(e2.to_string(), "startup failed: read config: disk full");
//! assert_eq!(e2.cause().to_string(), "disk full");
//! println!("{:+}", e2);                              // message + stack trace
//! ```
//!
//! ## Creating and Annotating
//!
//! | Function | Captures a stack | Absent input |
//! |----------|------------------|--------------|
//! | [`new(msg)`](new) | ✅ at the call | n/a |
//! | [`errorf!(...)`](errorf!) | ✅ at the call | n/a |
//! | [`ensure_stack(err)`](ensure_stack) | ✅ unless the chain has one | `None` → `None` |
//! | [`wrap(err, msg)`](wrap) | ✅ unless the chain has one | `None` → `None` |
//! | [`wrapf!(err, ...)`](wrapf!) | ✅ unless the chain has one | `None` → `None` |
//! | [`with_message(err, msg)`](with_message) | ❌ never | `None` → `None` |
//! | [`with_messagef!(err, ...)`](with_messagef!) | ❌ never | `None` → `None` |
//!
//! **Key rule**: a chain carries exactly one stack, the one captured closest to
//! the original failure. Wrapping an error that already has a stack only adds
//! text.
//!
//! The same operations exist as methods on `Result` through [`ResultExt`]:
//!
//! ```rust
//! use causeway::{Error, ResultExt};
//!
//! fn parse(input: &str) -> Result<u16, Error> {
//!     input.parse::<u16>().wrap_with(|| format!("parse port {:?}", input))
//! }
//!
//! let err = parse("http").unwrap_err();
//! assert!(err.to_string().starts_with("parse port \"http\": "));
//! ```
//!
//! ## Getting the Cause Back
//!
//! | Function | Returns |
//! |----------|---------|
//! | [`cause(err)`](cause) | First node carrying a stack, or the leaf if none does |
//! | [`root(err)`](root) | The leaf, always |
//! | [`find::<T>(err)`](find) | First node of type `T` (your original error) |
//! | [`stack_trace(err)`](stack_trace) | The chain's [`StackTrace`] |
//! | [`chain(err)`](chain()) | Iterator over every node, outermost first |
//!
//! ## Formatting
//!
//! | Format | Output |
//! |--------|--------|
//! | `{}`   | `outer: inner: root` |
//! | `{:+}` | the above, then one `function` / `\tfile:line` pair per frame |
//! | `{:?}` | `"outer: inner: root"` (quoted, escaped) |
//!
//! ## Features
//!
//! - `tinyvec-256-bytes`, `smallvec-256-bytes`: keep captured call sites
//!   inline instead of in a heap `Vec`.
//!
//! Capture and reuse decisions are reported as `tracing` events at `trace`
//! level.

#![deny(unsafe_code)]

/// Capture a stack for `$err` unless its chain already carries one.
///
/// Expands inside the public entry point so the capture drops exactly that
/// one frame.
macro_rules! stack_for {
    ($err:expr) => {
        if $crate::chain::locate_stack(&*$err).is_some() {
            None
        } else {
            Some($crate::stack::StackTrace::capture(1))
        }
    };
}

mod chain;
mod error;
mod ext;
mod node;
pub mod prelude;
mod stack;

use core::fmt;
use core::panic::Location;

pub use chain::{Chain, cause, chain, find, root, stack_trace, stack_tracer};
pub use error::Error;
pub use ext::ResultExt;
pub use node::{Annotated, BoxError, Message, StackTracer, WithStack};
pub use stack::{CallSite, MAX_DEPTH, StackTrace};

// ============================================================================
// Constructors
// ============================================================================

/// Create an error from `message`, capturing the stack at the caller.
///
/// ```rust
/// let err = causeway::new("disk full");
/// assert_eq!(err.to_string(), "disk full");
/// assert!(!err.stack_trace().unwrap().is_empty());
/// ```
#[track_caller]
#[inline(never)]
pub fn new(message: impl Into<String>) -> Error {
    let leaf: BoxError = Box::new(Message::new(message));
    let stack = StackTrace::capture(1);
    Error::stacked(leaf, Some(stack), Location::caller())
}

/// Create an error from format arguments, capturing the stack at the caller.
///
/// Usually called through [`errorf!`].
#[track_caller]
#[inline(never)]
pub fn errorf(args: fmt::Arguments<'_>) -> Error {
    let leaf: BoxError = Box::new(Message::new(args.to_string()));
    let stack = StackTrace::capture(1);
    Error::stacked(leaf, Some(stack), Location::caller())
}

// ============================================================================
// Stack-forcing annotations
// ============================================================================

/// Make sure `err`'s chain carries a stack trace.
///
/// If some node already carries one, `err` is returned with no new capture.
/// Otherwise the stack is captured here, at the caller. `None` stays `None`.
///
/// ```rust
/// use std::io;
///
/// let io_err = io::Error::other("broken pipe");
/// let once = causeway::ensure_stack(Some(io_err)).unwrap();
/// let first = once.stack_trace().unwrap().clone();
/// let twice = causeway::ensure_stack(Some(once)).unwrap();
/// assert_eq!(twice.stack_trace(), Some(&first));
///
/// assert!(causeway::ensure_stack(None::<io::Error>).is_none());
/// ```
#[track_caller]
#[inline(never)]
pub fn ensure_stack<E: Into<BoxError>>(err: Option<E>) -> Option<Error> {
    let err = err?.into();
    let stack = stack_for!(err);
    Some(Error::stacked(err, stack, Location::caller()))
}

/// Prepend `message` to `err` and make sure the chain carries a stack trace.
///
/// The text becomes `message: <err text>`. `None` stays `None`.
///
/// ```rust
/// let err = causeway::wrap(Some("connection reset"), "fetch index").unwrap();
/// assert_eq!(err.to_string(), "fetch index: connection reset");
/// assert!(err.stack_trace().is_some());
///
/// assert!(causeway::wrap(None::<&str>, "fetch index").is_none());
/// ```
#[track_caller]
#[inline(never)]
pub fn wrap<E: Into<BoxError>>(err: Option<E>, message: impl Into<String>) -> Option<Error> {
    let err = err?.into();
    let stack = stack_for!(err);
    Some(Error::stacked(err, stack, Location::caller()).wrapped_in(message.into()))
}

/// [`wrap`] with a formatted message. Usually called through [`wrapf!`].
#[track_caller]
#[inline(never)]
pub fn wrapf<E: Into<BoxError>>(err: Option<E>, args: fmt::Arguments<'_>) -> Option<Error> {
    let err = err?.into();
    let stack = stack_for!(err);
    Some(Error::stacked(err, stack, Location::caller()).wrapped_in(args.to_string()))
}

// ============================================================================
// Message-only annotations
// ============================================================================

/// Prepend `message` to `err` without capturing a stack.
///
/// Use on hot paths or when re-annotating errors that already crossed a
/// `wrap`. `None` stays `None`.
///
/// ```rust
/// let err = causeway::with_message(Some("timeout"), "poll").unwrap();
/// assert_eq!(err.to_string(), "poll: timeout");
/// assert!(err.stack_trace().is_none());
/// ```
pub fn with_message<E: Into<BoxError>>(err: Option<E>, message: impl Into<String>) -> Option<Error> {
    let err = err?.into();
    Some(Error::annotated(Annotated::new(message.into(), err)))
}

/// [`with_message`] with a formatted message. Usually called through [`with_messagef!`].
pub fn with_messagef<E: Into<BoxError>>(err: Option<E>, args: fmt::Arguments<'_>) -> Option<Error> {
    let err = err?.into();
    Some(Error::annotated(Annotated::new(args.to_string(), err)))
}

// ============================================================================
// Formatting macros
// ============================================================================

/// Create an error from a format string, capturing the stack here.
///
/// ```rust
/// let err = causeway::errorf!("user {} not found", 42);
/// assert_eq!(err.to_string(), "user 42 not found");
/// ```
#[macro_export]
macro_rules! errorf {
    ($($arg:tt)*) => {
        $crate::errorf(::core::format_args!($($arg)*))
    };
}

/// Wrap an `Option` error with a formatted message. See [`wrap`].
///
/// ```rust
/// let err = causeway::wrapf!(Some("eof"), "read block {}", 7).unwrap();
/// assert_eq!(err.to_string(), "read block 7: eof");
/// ```
#[macro_export]
macro_rules! wrapf {
    ($err:expr, $($arg:tt)*) => {
        $crate::wrapf($err, ::core::format_args!($($arg)*))
    };
}

/// Annotate an `Option` error with a formatted message, no stack. See [`with_message`].
///
/// ```rust
/// let err = causeway::with_messagef!(Some("eof"), "retry {}", 3).unwrap();
/// assert_eq!(err.to_string(), "retry 3: eof");
/// ```
#[macro_export]
macro_rules! with_messagef {
    ($err:expr, $($arg:tt)*) => {
        $crate::with_messagef($err, ::core::format_args!($($arg)*))
    };
}
