//! Convenient re-exports for common usage.
//!
//! ## Usage
//!
//! ```rust
//! use causeway::prelude::*;
//!
//! fn inner() -> Result<(), Error> {
//!     Err(causeway::new("not found"))
//! }
//!
//! fn outer() -> Result<(), Error> {
//!     inner().wrap("looking up user")?;
//!     Ok(())
//! }
//!
//! let err = outer().unwrap_err();
//! assert_eq!(err.to_string(), "looking up user: not found");
//! ```

pub use crate::Error;
pub use crate::ResultExt;
pub use crate::StackTracer;
pub use crate::cause;
