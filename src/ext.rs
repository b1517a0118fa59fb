//! Extension trait for annotating errors directly on `Result`s.
//!
//! [`ResultExt`] mirrors the free functions: `.wrap()` and `.ensure_stack()`
//! guarantee a stack on the chain, `.with_message()` only adds text. `Ok`
//! values pass through untouched, the `Result` counterpart of "absent in,
//! absent out".

use core::panic::Location;

use crate::error::Error;
use crate::node::{Annotated, BoxError};

/// Annotation methods for any `Result` whose error converts into [`BoxError`].
///
/// ## Example
///
/// ```rust
/// use causeway::{Error, ResultExt};
/// use std::io;
///
/// fn read_config() -> Result<String, io::Error> {
///     Err(io::Error::new(io::ErrorKind::NotFound, "config.toml"))
/// }
///
/// fn startup() -> Result<String, Error> {
///     read_config().wrap("read config")
/// }
///
/// let err = startup().unwrap_err();
/// assert_eq!(err.to_string(), "read config: config.toml");
/// assert!(err.stack_trace().is_some());
/// ```
pub trait ResultExt<T> {
    /// Make sure the error chain carries a stack trace, capturing one here if
    /// it does not.
    #[track_caller]
    fn ensure_stack(self) -> Result<T, Error>;

    /// Prepend `message` and make sure the chain carries a stack trace.
    #[track_caller]
    fn wrap(self, message: impl Into<String>) -> Result<T, Error>;

    /// Like [`wrap`](Self::wrap), but the message is only built on `Err`.
    #[track_caller]
    fn wrap_with<M: Into<String>>(self, f: impl FnOnce() -> M) -> Result<T, Error>;

    /// Prepend `message` without capturing a stack.
    fn with_message(self, message: impl Into<String>) -> Result<T, Error>;

    /// Like [`with_message`](Self::with_message), but the message is only built on `Err`.
    fn with_message_with<M: Into<String>>(self, f: impl FnOnce() -> M) -> Result<T, Error>;
}

impl<T, E: Into<BoxError>> ResultExt<T> for Result<T, E> {
    #[track_caller]
    #[inline(never)]
    fn ensure_stack(self) -> Result<T, Error> {
        match self {
            Ok(v) => Ok(v),
            Err(e) => {
                let err = e.into();
                let stack = stack_for!(err);
                Err(Error::stacked(err, stack, Location::caller()))
            }
        }
    }

    #[track_caller]
    #[inline(never)]
    fn wrap(self, message: impl Into<String>) -> Result<T, Error> {
        match self {
            Ok(v) => Ok(v),
            Err(e) => {
                let err = e.into();
                let stack = stack_for!(err);
                Err(Error::stacked(err, stack, Location::caller()).wrapped_in(message.into()))
            }
        }
    }

    #[track_caller]
    #[inline(never)]
    fn wrap_with<M: Into<String>>(self, f: impl FnOnce() -> M) -> Result<T, Error> {
        match self {
            Ok(v) => Ok(v),
            Err(e) => {
                let err = e.into();
                let stack = stack_for!(err);
                Err(Error::stacked(err, stack, Location::caller()).wrapped_in(f().into()))
            }
        }
    }

    #[inline]
    fn with_message(self, message: impl Into<String>) -> Result<T, Error> {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(Error::annotated(Annotated::new(message.into(), e.into()))),
        }
    }

    #[inline]
    fn with_message_with<M: Into<String>>(self, f: impl FnOnce() -> M) -> Result<T, Error> {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(Error::annotated(Annotated::new(f().into(), e.into()))),
        }
    }
}
