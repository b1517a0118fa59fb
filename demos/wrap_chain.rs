//! Demonstrates a three-layer service annotating one failure on its way up.
//!
//! Run with: cargo run --example wrap_chain

use causeway::{Error, ResultExt, StackTracer, cause, stack_tracer};
use std::fmt;

// ============================================================================
// Storage layer - a plain error type, no causeway involvement
// ============================================================================

#[derive(Debug)]
#[allow(dead_code)]
enum DbError {
    Timeout { after_ms: u64 },
    Missing(String),
}

impl fmt::Display for DbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbError::Timeout { after_ms } => write!(f, "query timed out after {}ms", after_ms),
            DbError::Missing(key) => write!(f, "row {} missing", key),
        }
    }
}

impl std::error::Error for DbError {}

fn db_fetch(user_id: u32) -> Result<String, DbError> {
    Err(DbError::Missing(format!("users/{}", user_id)))
}

// ============================================================================
// Service layer - first annotation captures the stack
// ============================================================================

fn load_profile(user_id: u32) -> Result<String, Error> {
    db_fetch(user_id).wrap_with(|| format!("load profile {}", user_id))
}

fn render_page(user_id: u32) -> Result<String, Error> {
    let profile = load_profile(user_id).wrap("render page")?;
    Ok(format!("<h1>{}</h1>", profile))
}

// ============================================================================
// Handler layer - message only, no second capture
// ============================================================================

fn handle_request(path: &str, user_id: u32) -> Result<String, Error> {
    render_page(user_id).with_message(format!("GET {}", path))
}

fn main() {
    let err = match handle_request("/profile/7", 7) {
        Ok(page) => {
            println!("{}", page);
            return;
        }
        Err(err) => err,
    };

    println!("=== short ({{}}) ===");
    println!("{}", err);
    println!();

    println!("=== quoted ({{:?}}) ===");
    println!("{:?}", err);
    println!();

    println!("=== cause ===");
    println!("{}", cause(&err));
    if let Some(db) = err.find::<DbError>() {
        println!("original DbError: {:?}", db);
    }
    println!();

    // The handler layer is message-only, so the stack is printed from the
    // error the service layer returned.
    println!("=== extended ({{:+}}) ===");
    if let Some(tracer) = stack_tracer(&err) {
        println!("{:+}", tracer);
        println!();
        println!("captured {} call sites, innermost first:", tracer.stack_trace().len());
        for site in tracer.stack_trace() {
            println!(
                "  {}",
                site.short_function().unwrap_or_else(|| "unknown".into())
            );
        }
    }
}
