//! Call-stack snapshots that are cheap to take and resolved only when printed.
//!
//! [`Trace::capture`] records raw return addresses into a bounded buffer and
//! does no symbol lookup. Each [`Caller`] is resolved into [`Frame`]s when the
//! trace is rendered, which only happens on the error-reporting path.
//!
//! # Examples
//!
//! ```
//! use panic_rail::{Trace, TraceConfig};
//!
//! let trace = Trace::capture(0);
//! assert!(trace.len() <= panic_rail::types::trace::MAX_DEPTH);
//!
//! let config = TraceConfig::full();
//! assert_eq!(trace.render_with(&config, 1), trace.render_with(&config, 1));
//! ```

use std::borrow::Cow;
use std::ffi::c_void;
use std::fmt::{self, Write};
use std::path::{Path, PathBuf};

use smallvec::SmallVec;

use crate::types::trace_config::{trace_config, TraceConfig};

/// Maximum number of callers kept per trace.
pub const MAX_DEPTH: usize = 64;

/// Raw frames walked before the capture point is located and trimmed.
const RAW_CAPACITY: usize = MAX_DEPTH * 2;

/// Function names wider than this are not padded in table layout.
const MAX_ALIGNED_WIDTH: usize = 48;

/// One level of indentation in rendered output.
pub(crate) const INDENT: &str = "  ";

/// An opaque return address captured from the stack.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Caller(usize);

impl Caller {
    #[inline]
    pub const fn from_addr(addr: usize) -> Self {
        Self(addr)
    }

    #[inline]
    pub const fn addr(self) -> usize {
        self.0
    }

    /// Resolves this address into source frames, innermost inlined frame first.
    ///
    /// Addresses without debug information resolve to an empty vector.
    pub fn resolve(self) -> Vec<Frame> {
        let mut frames = Vec::new();
        // A return address points just past the call instruction.
        let addr = self.0.saturating_sub(1) as *mut c_void;
        backtrace::resolve(addr, |symbol| {
            let function = symbol.name().map(|name| format!("{name:#}")).unwrap_or_default();
            let file = symbol.filename().map(Path::to_path_buf);
            if function.is_empty() && file.is_none() {
                return;
            }
            frames.push(Frame { function, file, line: symbol.lineno() });
        });
        frames
    }
}

impl fmt::Debug for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Caller({:#x})", self.0)
    }
}

/// A resolved stack frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Frame {
    /// Demangled function name without the symbol hash; empty when unknown.
    pub function: String,
    pub file: Option<PathBuf>,
    pub line: Option<u32>,
}

/// A bounded snapshot of return addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Trace {
    callers: SmallVec<[Caller; 16]>,
}

impl Trace {
    /// A trace with no callers. Renders as the empty string.
    #[inline]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a trace from already captured callers, keeping at most [`MAX_DEPTH`].
    pub fn from_callers<I>(callers: I) -> Self
    where
        I: IntoIterator<Item = Caller>,
    {
        Self { callers: callers.into_iter().take(MAX_DEPTH).collect() }
    }

    /// Captures the current stack.
    ///
    /// With `skip == 0` the first frame is the function that called `capture`;
    /// each increment drops one more frame above it.
    #[inline(never)]
    pub fn capture(skip: usize) -> Self {
        let this_fn = Self::capture as fn(usize) -> Self as usize;
        let mut raw: SmallVec<[usize; RAW_CAPACITY]> = SmallVec::new();
        let mut own_frame = None;

        backtrace::trace(|frame| {
            if own_frame.is_none() && frame.symbol_address() as usize == this_fn {
                own_frame = Some(raw.len());
            }
            raw.push(frame.ip() as usize);
            raw.len() < RAW_CAPACITY
        });

        let start = own_frame.map_or(0, |index| index + 1).saturating_add(skip);
        Self::from_callers(raw.iter().skip(start).map(|&ip| Caller(ip)))
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.callers.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.callers.len()
    }

    #[inline]
    pub fn callers(&self) -> &[Caller] {
        &self.callers
    }

    /// Resolves every caller and applies the frame filters of `config`.
    pub fn frames(&self, config: &TraceConfig) -> Vec<Frame> {
        let mut frames: Vec<Frame> = self
            .callers
            .iter()
            .flat_map(|caller| caller.resolve())
            .filter(|frame| !(config.skip_runtime_frames && config.is_runtime_frame(frame)))
            .collect();
        frames.truncate(config.max_frames);
        frames
    }

    /// Renders with the process-wide configuration.
    pub fn render(&self, indent: usize) -> String {
        self.render_with(&trace_config(), indent)
    }

    /// Renders one line (table) or two lines (multi-line) per frame, each
    /// prefixed by `indent` levels of indentation and ending in a newline.
    pub fn render_with(&self, config: &TraceConfig, indent: usize) -> String {
        let frames = self.frames(config);
        let mut out = String::new();
        if frames.is_empty() {
            return out;
        }

        let pad = INDENT.repeat(indent);
        let rows: Vec<(Cow<'_, str>, Option<String>)> = frames
            .iter()
            .map(|frame| (function_label(&frame.function, config), location(frame, config)))
            .collect();

        if config.table {
            let width = rows
                .iter()
                .map(|(name, _)| name.chars().count())
                .filter(|&width| width <= MAX_ALIGNED_WIDTH)
                .max()
                .unwrap_or(0);
            for (name, location) in &rows {
                let _ = write!(out, "{pad}{name:>width$}");
                if let Some(location) = location {
                    let _ = write!(out, "  {location}");
                }
                out.push('\n');
            }
        } else {
            for (name, location) in &rows {
                let _ = writeln!(out, "{pad}{name}");
                if let Some(location) = location {
                    let _ = writeln!(out, "{pad}{INDENT}{INDENT}{location}");
                }
            }
        }
        out
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(0))
    }
}

fn function_label<'a>(function: &'a str, config: &TraceConfig) -> Cow<'a, str> {
    if function.is_empty() {
        Cow::Borrowed("???")
    } else if config.short_function_names {
        Cow::Owned(short_function_name(function))
    } else {
        Cow::Borrowed(function)
    }
}

fn location(frame: &Frame, config: &TraceConfig) -> Option<String> {
    let file = frame.file.as_deref()?;
    let shown = config
        .base_dir
        .as_deref()
        .and_then(|base| file.strip_prefix(base).ok())
        .unwrap_or(file);
    Some(match frame.line {
        Some(line) => format!("{}:{line}", shown.display()),
        None => shown.display().to_string(),
    })
}

/// `<a::b::Foo<T> as c::Bar>::run::{{closure}}` becomes `Foo::run::{{closure}}`.
fn short_function_name(name: &str) -> String {
    let (self_ty, rest) = split_qualified(name);
    let plain = strip_generics(self_ty) + &strip_generics(rest);
    let segments: Vec<&str> = plain.split("::").filter(|segment| !segment.is_empty()).collect();
    let closures = segments.iter().rev().take_while(|segment| segment.starts_with('{')).count();
    let keep = closures + 2;
    let short = segments[segments.len().saturating_sub(keep)..].join("::");
    if short.is_empty() {
        name.to_owned()
    } else {
        short
    }
}

/// Splits `<Self as Trait>::rest` into `("Self", "::rest")`.
fn split_qualified(name: &str) -> (&str, &str) {
    let Some(inner) = name.strip_prefix('<') else {
        return (name, "");
    };
    let mut depth = 1usize;
    let mut prev = '\0';
    for (index, c) in inner.char_indices() {
        if c == '<' {
            depth += 1;
        } else if c == '>' && prev != '-' {
            depth -= 1;
            if depth == 0 {
                let qualified = &inner[..index];
                let self_ty = qualified.split(" as ").next().unwrap_or(qualified);
                return (self_ty.trim_start_matches('&'), &inner[index + 1..]);
            }
        }
        prev = c;
    }
    (name, "")
}

fn strip_generics(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut depth = 0usize;
    let mut prev = '\0';
    for c in name.chars() {
        match c {
            '<' => depth += 1,
            '>' if prev != '-' && depth > 0 => depth -= 1,
            _ if depth == 0 => out.push(c),
            _ => {},
        }
        prev = c;
    }
    out
}
