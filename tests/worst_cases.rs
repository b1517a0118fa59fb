//! Worst-case scenarios for causeway usage patterns.
//!
//! These tests explore edge cases and problematic patterns to ensure
//! the library behaves correctly under stress and misuse.

use causeway::{
    Error, MAX_DEPTH, ResultExt, StackTrace, WithStack, cause, ensure_stack, new, with_message,
    wrap,
};
use std::fmt;

#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
enum TestError {
    Failed,
    IoError,
    ParseError,
}

impl fmt::Display for TestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestError::Failed => write!(f, "failed"),
            TestError::IoError => write!(f, "io error"),
            TestError::ParseError => write!(f, "parse error"),
        }
    }
}

impl std::error::Error for TestError {}

fn stack_nodes(err: &Error) -> usize {
    err.chain().filter(|node| node.is::<WithStack>()).count()
}

// ============================================================================
// Re-stacking - ensure_stack / wrap on already-stacked errors
// ============================================================================

/// User calls ensure_stack on every layer out of habit.
/// Only the first call captures.
#[test]
fn ensure_stack_every_layer_captures_once() {
    fn inner() -> Result<(), Error> {
        Err(TestError::Failed).ensure_stack()
    }

    fn middle() -> Result<(), Error> {
        inner().ensure_stack()
    }

    fn outer() -> Result<(), Error> {
        middle().ensure_stack()
    }

    let err = outer().unwrap_err();
    assert_eq!(stack_nodes(&err), 1);
    assert_eq!(err.to_string(), "failed");
    assert_eq!(cause(&err).to_string(), "failed");
}

/// A stack hidden under a foreign error type is still found and reused.
#[test]
fn stack_below_foreign_wrapper_is_reused() {
    #[derive(Debug)]
    struct Foreign(Error);

    impl fmt::Display for Foreign {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "foreign")
        }
    }

    impl std::error::Error for Foreign {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    let err = wrap(Some(Foreign(new("deep"))), "top").unwrap();
    assert_eq!(stack_nodes(&err), 1);
    assert_eq!(err.to_string(), "top: foreign");
    assert_eq!(cause(&err).to_string(), "deep");
}

// ============================================================================
// Deep chains
// ============================================================================

/// 20-level deep call chain, wrapped at every level
#[test]
fn deep_wrap_chain_20_levels() {
    fn level(n: u32) -> Result<(), Error> {
        if n == 0 {
            Err(TestError::IoError).wrap("level 0")
        } else {
            level(n - 1).wrap_with(|| format!("level {}", n))
        }
    }

    let err = level(19).unwrap_err();
    assert_eq!(stack_nodes(&err), 1);
    assert!(err.to_string().starts_with("level 19: level 18: "));
    assert!(err.to_string().ends_with("level 1: level 0: io error"));
}

/// 1000 annotations on a single chain (stress test)
#[test]
fn deep_wrap_chain_1000_levels() {
    let mut err = wrap(Some(TestError::Failed), "0");
    for i in 1..1000 {
        err = if i % 2 == 0 {
            wrap(err, i.to_string())
        } else {
            with_message(err, i.to_string())
        };
    }
    let err = err.unwrap();

    assert_eq!(stack_nodes(&err), 1);
    assert!(err.to_string().starts_with("999: 998: "));
    assert!(err.to_string().ends_with("1: 0: failed"));
    assert_eq!(cause(&err).to_string(), "failed");
    assert!(err.root().is::<TestError>());
}

/// Capturing deep inside recursion keeps only the innermost MAX_DEPTH frames.
#[test]
fn deep_recursion_capture_is_bounded() {
    fn recurse(depth: u32) -> Error {
        if depth == 0 {
            new("bottom")
        } else {
            let err = recurse(depth - 1);
            std::hint::black_box(depth);
            err
        }
    }

    let err = recurse(200);
    let trace = err.stack_trace().unwrap();
    assert_eq!(trace.len(), MAX_DEPTH);
    let name = trace.innermost().unwrap().function().unwrap_or_default();
    assert!(name.contains("recurse"), "Got {:?}", name);

    let extended = format!("{:+}", err);
    assert_eq!(extended.matches("\n\t").count(), MAX_DEPTH);
}

// ============================================================================
// Hot loops with errors
// ============================================================================

/// Simulates a hot loop where every iteration fails.
/// This is the worst-case for allocation pressure.
#[test]
fn hot_loop_all_errors() {
    fn process_item(i: usize) -> Result<(), Error> {
        Err(TestError::Failed).wrap_with(|| format!("item {}", i))
    }

    let mut errors = Vec::new();
    for i in 0..1000 {
        if let Err(e) = process_item(i) {
            errors.push(e);
        }
    }

    assert_eq!(errors.len(), 1000);
    // Each error has its own stack
    for (i, err) in errors.iter().enumerate() {
        assert_eq!(stack_nodes(err), 1);
        assert_eq!(err.to_string(), format!("item {}: failed", i));
    }
}

/// Hot loop with message-only annotations never captures.
#[test]
fn hot_loop_message_only() {
    fn process_item(i: usize) -> Result<usize, Error> {
        if i % 100 == 0 {
            Err(TestError::ParseError).with_message("skip")
        } else {
            Ok(i * 2)
        }
    }

    let mut successes = 0;
    let mut failures = 0;

    for i in 0..10000 {
        match process_item(i) {
            Ok(_) => successes += 1,
            Err(e) => {
                assert!(e.stack_trace().is_none());
                failures += 1;
            }
        }
    }

    assert_eq!(successes, 9900);
    assert_eq!(failures, 100);
}

// ============================================================================
// Text edge cases
// ============================================================================

/// Empty annotation still joins with a separator.
#[test]
fn empty_annotation() {
    let err = wrap(Some(TestError::Failed), "").unwrap();
    assert_eq!(err.to_string(), ": failed");
    let err = new("");
    assert_eq!(err.to_string(), "");
    assert_eq!(format!("{:?}", err), "\"\"");
}

/// Very long annotation
#[test]
fn very_long_annotation() {
    let long_msg = "x".repeat(10000);
    let err = wrap(Some(TestError::Failed), long_msg.clone()).unwrap();
    assert_eq!(err.to_string().len(), long_msg.len() + ": failed".len());
    assert!(format!("{:+}", err).starts_with(&long_msg));
}

/// Unicode in annotations
#[test]
fn unicode_annotation() {
    let err = with_message(Some(new("ディスクがいっぱい")), "émojis: 🦀🔥").unwrap();
    assert_eq!(err.to_string(), "émojis: 🦀🔥: ディスクがいっぱい");
    let quoted = format!("{:?}", err);
    assert!(quoted.contains("🦀"));
    assert!(quoted.starts_with('"') && quoted.ends_with('"'));
}

// ============================================================================
// Absent input through every operation
// ============================================================================

#[test]
fn absent_input_everywhere() {
    let nothing: Option<TestError> = None;
    assert!(ensure_stack(nothing.clone()).is_none());
    assert!(wrap(nothing.clone(), "a").is_none());
    assert!(with_message(nothing.clone(), "a").is_none());
    assert!(causeway::wrapf!(nothing.clone(), "a{}", 1).is_none());
    assert!(causeway::with_messagef!(nothing, "a{}", 1).is_none());

    // Chained through several layers, still absent.
    let chained = wrap(with_message(wrap(None::<TestError>, "a"), "b"), "c");
    assert!(chained.is_none());
}

// ============================================================================
// Hand-built traces
// ============================================================================

#[test]
fn empty_trace_formats_as_nothing() {
    let empty = StackTrace::default();
    assert!(empty.is_empty());
    assert_eq!(empty.innermost(), None);
    assert_eq!(format!("{}", empty), "[]");
    assert_eq!(format!("{:+}", empty), "");
}

// ============================================================================
// Concurrent usage
// ============================================================================

/// Create error in thread, consume in main
#[test]
fn error_across_threads() {
    use std::thread;

    let handle = thread::spawn(|| -> Result<(), Error> {
        Err(TestError::Failed).wrap("from thread")
    });

    let result = handle.join().unwrap();
    let err = result.unwrap_err();
    assert_eq!(stack_nodes(&err), 1);
    assert_eq!(err.to_string(), "from thread: failed");

    let err = wrap(Some(err), "in main").unwrap();
    assert_eq!(stack_nodes(&err), 1);
}

/// Many threads capturing at once
#[test]
fn many_threads_capture_concurrently() {
    use std::thread;

    let handles: Vec<_> = (0..16)
        .map(|i| {
            thread::spawn(move || {
                let mut err = Some(new(format!("worker {}", i)));
                for depth in 0..50 {
                    err = wrap(err, format!("d{}", depth));
                }
                err.unwrap()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let err = handle.join().unwrap();
        assert_eq!(stack_nodes(&err), 1);
        assert_eq!(cause(&err).to_string(), format!("worker {}", i));
        assert!(err.to_string().starts_with("d49: d48: "));
    }
}
