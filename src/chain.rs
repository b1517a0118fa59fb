//! Walking error chains.
//!
//! A chain is the singly-linked list formed by [`source()`](core::error::Error::source)
//! links. It is finite and acyclic because every node owns its cause.

use core::error::Error as StdError;

use crate::node::{StackTracer, WithStack};
use crate::stack::StackTrace;

/// First node in the chain that carries a captured stack.
///
/// The only place that decides whether a chain already has a stack.
pub(crate) fn locate_stack<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a WithStack> {
    chain(err).find_map(|node| node.downcast_ref::<WithStack>())
}

/// Iterator over every node of a chain, outermost first.
///
/// Returned by [`chain`] and [`Error::chain`](crate::Error::chain).
#[derive(Clone)]
pub struct Chain<'a> {
    next: Option<&'a (dyn StdError + 'static)>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a (dyn StdError + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.source();
        Some(current)
    }
}

impl core::iter::FusedIterator for Chain<'_> {}

/// Iterate over `err` and all of its causes, outermost first.
pub fn chain<'a>(err: &'a (dyn StdError + 'static)) -> Chain<'a> {
    Chain { next: Some(err) }
}

/// The diagnostic root cause of `err`.
///
/// Returns the first node (walking outermost to innermost) that carries a
/// captured stack. Stacks are captured once, near the failure, so this node
/// wraps the original error and its text is the original text. If no node
/// carries a stack, the leaf of the chain is returned.
///
/// The walk stops at the stack-bearing node even when message-only
/// annotations sit below it.
///
/// This takes a reference, so there is no absent input: callers holding an
/// `Option` check it first.
///
/// ```rust
/// let err = causeway::wrap(Some(causeway::new("disk full")), "read config").unwrap();
/// assert_eq!(causeway::cause(&err).to_string(), "disk full");
/// ```
pub fn cause<'a>(err: &'a (dyn StdError + 'static)) -> &'a (dyn StdError + 'static) {
    match locate_stack(err) {
        Some(node) => node as &(dyn StdError + 'static),
        None => root(err),
    }
}

/// The last node of the chain, the one without a source.
pub fn root<'a>(err: &'a (dyn StdError + 'static)) -> &'a (dyn StdError + 'static) {
    chain(err).last().unwrap_or(err)
}

/// The first node of the chain that exposes a stack trace.
pub fn stack_tracer<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a dyn StackTracer> {
    locate_stack(err).map(|node| node as &dyn StackTracer)
}

/// The stack trace carried by the chain, if any.
pub fn stack_trace<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a StackTrace> {
    locate_stack(err).map(|node| node.stack_trace())
}

/// The first node of concrete type `T`.
///
/// Use this to get the caller's original error back, unchanged, from under any
/// number of annotations.
pub fn find<'a, T: StdError + 'static>(err: &'a (dyn StdError + 'static)) -> Option<&'a T> {
    chain(err).find_map(|node| node.downcast_ref::<T>())
}
