//! Call-site capture and stack trace formatting.
//!
//! [`StackTrace::capture`] snapshots the active call stack as a fixed sequence
//! of [`CallSite`]s. Each call site is only an instruction pointer; function
//! name, file and line are resolved on demand when the trace is printed.

use core::ffi::c_void;
use core::fmt;
use std::path::{Path, PathBuf};

/// Maximum number of call sites kept by a single capture.
pub const MAX_DEPTH: usize = 32;

/// Upper bound on raw frames walked while looking for the recorder's own frame.
const SEARCH_LIMIT: usize = MAX_DEPTH + 64;

// ============================================================================
// SiteVec - configurable storage for captured call sites
// ============================================================================

/// Stack-first call-site storage, one full capture inline (tinyvec-256-bytes).
#[cfg(all(feature = "tinyvec-256-bytes", not(feature = "smallvec-256-bytes")))]
type SiteVec = tinyvec::TinyVec<[CallSite; MAX_DEPTH]>;

/// Stack-first call-site storage using smallvec.
#[cfg(feature = "smallvec-256-bytes")]
type SiteVec = smallvec::SmallVec<[CallSite; MAX_DEPTH]>;

/// Heap-allocated call-site storage (default, no tinyvec/smallvec feature).
#[cfg(not(any(feature = "tinyvec-256-bytes", feature = "smallvec-256-bytes")))]
type SiteVec = Vec<CallSite>;

// ============================================================================
// CallSite
// ============================================================================

/// One frame of a captured stack: an opaque program counter.
///
/// Symbol information is looked up every time it is requested, so a
/// `CallSite` stays one machine word and capture never touches debug info.
///
/// ## Formatting
///
/// | Format | Output |
/// |--------|--------|
/// | `{}`   | `file.rs:42` (file name only) |
/// | `{:+}` | `crate::module::function` then `\n\t/full/path/file.rs:42` |
///
/// Unresolvable frames print `unknown` for names and files and `0` for lines.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CallSite {
    ip: usize,
}

/// Symbol data for one call site.
#[derive(Default)]
struct Resolved {
    function: Option<String>,
    file: Option<PathBuf>,
    line: Option<u32>,
}

impl CallSite {
    /// Build a call site from a raw instruction pointer.
    ///
    /// An `ip` of zero never resolves and is useful as a placeholder.
    #[inline]
    pub const fn from_ip(ip: usize) -> Self {
        Self { ip }
    }

    /// The raw instruction pointer (a return address for all but the innermost frame).
    #[inline]
    pub const fn ip(&self) -> usize {
        self.ip
    }

    fn resolve(&self) -> Resolved {
        let mut resolved = Resolved::default();
        if self.ip == 0 {
            return resolved;
        }
        // Inlined frames report several symbols, innermost first.
        backtrace::resolve(self.ip as *mut c_void, |symbol| {
            if resolved.function.is_none() {
                resolved.function = symbol.name().map(|name| format!("{:#}", name));
            }
            if resolved.file.is_none() {
                resolved.file = symbol.filename().map(Path::to_path_buf);
                resolved.line = symbol.lineno();
            }
        });
        resolved
    }

    /// Fully qualified, demangled function name, if symbols are available.
    pub fn function(&self) -> Option<String> {
        self.resolve().function
    }

    /// Function name without its module path (`load` for `app::config::load`).
    pub fn short_function(&self) -> Option<String> {
        self.function().map(|name| short_name(&name).to_owned())
    }

    /// Source file path, if debug info is available.
    pub fn file(&self) -> Option<PathBuf> {
        self.resolve().file
    }

    /// Source line, if debug info is available.
    pub fn line(&self) -> Option<u32> {
        self.resolve().line
    }
}

/// Strip the module path from a demangled name, keeping closure markers
/// attached to the function they belong to.
pub(crate) fn short_name(name: &str) -> &str {
    let mut start = name.len();
    for (idx, _) in name.rmatch_indices("::") {
        let segment = &name[idx + 2..start];
        start = idx + 2;
        if !segment.starts_with("{{") {
            return &name[start..];
        }
        start = idx;
    }
    name
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let resolved = self.resolve();
        let line = resolved.line.unwrap_or(0);
        if f.sign_plus() {
            let function = resolved.function.as_deref().unwrap_or("unknown");
            match &resolved.file {
                Some(file) => write!(f, "{}\n\t{}:{}", function, file.display(), line),
                None => write!(f, "{}\n\tunknown:{}", function, line),
            }
        } else {
            let file = resolved
                .file
                .as_deref()
                .and_then(Path::file_name)
                .map(|name| name.to_string_lossy());
            match file {
                Some(file) => write!(f, "{}:{}", file, line),
                None => write!(f, "unknown:{}", line),
            }
        }
    }
}

impl fmt::Debug for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CallSite({:#x})", self.ip)
    }
}

// ============================================================================
// StackTrace
// ============================================================================

/// An immutable snapshot of the call stack, innermost frame first.
///
/// Index 0 is the function that asked for the capture (for error constructors:
/// the code that called [`new`](crate::new), [`wrap`](crate::wrap) and so on),
/// the last entry is the outermost frame that was kept.
///
/// ## Formatting
///
/// | Format | Output |
/// |--------|--------|
/// | `{}`   | `[main.rs:10 lib.rs:42]` |
/// | `{:+}` | each call site as `\n{:+}` (function, then tab-indented path:line) |
#[derive(Clone, PartialEq, Eq, Default)]
pub struct StackTrace {
    sites: SiteVec,
}

impl StackTrace {
    /// Capture the current call stack.
    ///
    /// The recorder's own frame is always dropped; `skip` drops that many more
    /// frames, so `capture(0)` starts at the function calling `capture` and an
    /// error constructor passes `1` to hide itself. At most [`MAX_DEPTH`]
    /// call sites are kept.
    ///
    /// ```rust
    /// use causeway::StackTrace;
    ///
    /// let here = StackTrace::capture(0);
    /// assert!(!here.is_empty());
    /// ```
    #[inline(never)]
    pub fn capture(skip: usize) -> Self {
        let anchor = (Self::capture as fn(usize) -> Self) as usize;
        let mut raw: Vec<usize> = Vec::new();
        let mut anchor_at: Option<usize> = None;

        backtrace::trace(|frame| {
            if anchor_at.is_none() && frame.symbol_address() as usize == anchor {
                anchor_at = Some(raw.len());
            }
            raw.push(frame.ip() as usize);
            match anchor_at {
                Some(at) => raw.len() < at + 1 + skip + MAX_DEPTH,
                None => raw.len() < SEARCH_LIMIT,
            }
        });

        // Without an anchor the unwinder's own frames stay in; best effort.
        let start = match anchor_at {
            Some(at) => at + 1 + skip,
            None => skip,
        };
        let sites: SiteVec = raw
            .iter()
            .skip(start)
            .take(MAX_DEPTH)
            .map(|&ip| CallSite::from_ip(ip))
            .collect();

        tracing::trace!(
            frames = sites.len(),
            skip,
            anchored = anchor_at.is_some(),
            "captured stack trace"
        );
        Self { sites }
    }

    /// Number of call sites.
    #[inline]
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    /// True if nothing was captured.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Call site at `index` (0 = innermost).
    #[inline]
    pub fn get(&self, index: usize) -> Option<&CallSite> {
        self.sites.get(index)
    }

    /// Innermost call site, the one that triggered the capture.
    #[inline]
    pub fn innermost(&self) -> Option<&CallSite> {
        self.sites.first()
    }

    /// All call sites as a slice, innermost first.
    #[inline]
    pub fn as_slice(&self) -> &[CallSite] {
        &self.sites[..]
    }

    /// Iterate over call sites, innermost first.
    pub fn iter(&self) -> impl Iterator<Item = &CallSite> {
        self.sites.iter()
    }
}

impl FromIterator<CallSite> for StackTrace {
    fn from_iter<I: IntoIterator<Item = CallSite>>(iter: I) -> Self {
        Self {
            sites: iter.into_iter().take(MAX_DEPTH).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a StackTrace {
    type Item = &'a CallSite;
    type IntoIter = core::slice::Iter<'a, CallSite>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl fmt::Display for StackTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.sign_plus() {
            for site in self.iter() {
                write!(f, "\n{:+}", site)?;
            }
            return Ok(());
        }
        f.write_str("[")?;
        for (i, site) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", site)?;
        }
        f.write_str("]")
    }
}

impl fmt::Debug for StackTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
