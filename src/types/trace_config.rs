//! Process-wide trace rendering configuration.
//!
//! These toggles only change how a [`Trace`](crate::types::Trace) is printed.
//! They never change what is captured or how failures propagate.
//!
//! # Environment
//!
//! Until [`set_trace_config`] is called, the global configuration is read once
//! from the environment:
//!
//! - `RUST_BACKTRACE=full` - start from [`TraceConfig::full`]
//! - `PANIC_RAIL_TRACE` - comma-separated options: `table`, `multiline`,
//!   `short_names`, `full_names`, `all_frames`, `runtime_frames`
//! - `PANIC_RAIL_BASE_DIR` - print file paths relative to this directory

use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};

use crate::types::trace::{Frame, MAX_DEPTH};

/// Function-name prefixes treated as runtime, unwinding, or test-harness frames.
pub const DEFAULT_RUNTIME_PREFIXES: &[&str] = &[
    "std::",
    "core::",
    "alloc::",
    "backtrace::",
    "test::",
    "tokio::",
    "__rust",
    "rust_begin_unwind",
    "rust_panic",
    "__libc_start",
    "_start",
    "start_thread",
    "__clone",
    "clone3",
    "panic_rail::recover::",
    "panic_rail::conc::",
    "panic_rail::types::trace::",
];

/// Rendering options for traces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceConfig {
    /// Right-align function names into a table instead of two lines per frame.
    pub table: bool,
    /// Hide frames whose function name starts with one of `runtime_prefixes`.
    pub skip_runtime_frames: bool,
    /// Print `Type::method` instead of the fully qualified, generic path.
    pub short_function_names: bool,
    /// Absolute paths under this directory are printed relative to it.
    pub base_dir: Option<PathBuf>,
    /// Prefixes consulted when `skip_runtime_frames` is set.
    pub runtime_prefixes: &'static [&'static str],
    /// Maximum number of resolved frames printed per trace.
    pub max_frames: usize,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            table: true,
            skip_runtime_frames: true,
            short_function_names: true,
            base_dir: None,
            runtime_prefixes: DEFAULT_RUNTIME_PREFIXES,
            max_frames: MAX_DEPTH,
        }
    }
}

impl TraceConfig {
    /// Everything: multi-line layout, full names, no elision.
    #[inline]
    pub fn full() -> Self {
        Self {
            table: false,
            skip_runtime_frames: false,
            short_function_names: false,
            max_frames: usize::MAX,
            ..Default::default()
        }
    }

    /// Dense table with short names and at most 16 frames.
    #[inline]
    pub fn compact() -> Self {
        Self { max_frames: 16, ..Default::default() }
    }

    /// Default elision and names, one frame per two lines.
    #[inline]
    pub fn multiline() -> Self {
        Self { table: false, ..Default::default() }
    }

    #[inline]
    pub fn with_table(mut self, table: bool) -> Self {
        self.table = table;
        self
    }

    #[inline]
    pub fn with_skip_runtime_frames(mut self, skip: bool) -> Self {
        self.skip_runtime_frames = skip;
        self
    }

    #[inline]
    pub fn with_short_function_names(mut self, short: bool) -> Self {
        self.short_function_names = short;
        self
    }

    #[inline]
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    #[inline]
    pub fn with_runtime_prefixes(mut self, prefixes: &'static [&'static str]) -> Self {
        self.runtime_prefixes = prefixes;
        self
    }

    #[inline]
    pub fn with_max_frames(mut self, max_frames: usize) -> Self {
        self.max_frames = max_frames;
        self
    }

    /// Builds the configuration described in the module docs from the environment.
    pub fn from_env() -> Self {
        let full = std::env::var_os("RUST_BACKTRACE").is_some_and(|var| var == "full");
        let mut config = if full { Self::full() } else { Self::default() };

        if let Some(options) = std::env::var_os("PANIC_RAIL_TRACE") {
            config = config.apply_options(&options.to_string_lossy());
        }
        if let Some(base_dir) = std::env::var_os("PANIC_RAIL_BASE_DIR") {
            config.base_dir = Some(PathBuf::from(base_dir));
        }
        config
    }

    /// Applies a comma-separated option list (the `PANIC_RAIL_TRACE` syntax).
    ///
    /// Unknown options are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use panic_rail::TraceConfig;
    ///
    /// let config = TraceConfig::default().apply_options("multiline, full_names");
    /// assert!(!config.table);
    /// assert!(!config.short_function_names);
    /// assert!(config.skip_runtime_frames);
    /// ```
    pub fn apply_options(mut self, options: &str) -> Self {
        for option in options.split(',').map(str::trim).filter(|opt| !opt.is_empty()) {
            if option.eq_ignore_ascii_case("table") {
                self.table = true;
            } else if option.eq_ignore_ascii_case("multiline") {
                self.table = false;
            } else if option.eq_ignore_ascii_case("short_names") {
                self.short_function_names = true;
            } else if option.eq_ignore_ascii_case("full_names") {
                self.short_function_names = false;
            } else if option.eq_ignore_ascii_case("all_frames") {
                self.skip_runtime_frames = false;
            } else if option.eq_ignore_ascii_case("runtime_frames") {
                self.skip_runtime_frames = true;
            } else {
                tracing::debug!(option, "ignoring unknown PANIC_RAIL_TRACE option");
            }
        }
        self
    }

    /// Returns true if `frame` belongs to the runtime, the unwinder, or the test harness.
    pub fn is_runtime_frame(&self, frame: &Frame) -> bool {
        let name = frame.function.trim_start_matches('<');
        self.runtime_prefixes.iter().any(|prefix| name.starts_with(prefix))
    }
}

static GLOBAL: RwLock<Option<TraceConfig>> = RwLock::new(None);

/// Replaces the process-wide trace configuration.
pub fn set_trace_config(config: TraceConfig) {
    let mut global = GLOBAL.write().unwrap_or_else(PoisonError::into_inner);
    *global = Some(config);
}

/// Returns a copy of the process-wide trace configuration.
///
/// The first call without a prior [`set_trace_config`] reads the environment.
pub fn trace_config() -> TraceConfig {
    if let Some(config) = GLOBAL.read().unwrap_or_else(PoisonError::into_inner).as_ref() {
        return config.clone();
    }
    let mut global = GLOBAL.write().unwrap_or_else(PoisonError::into_inner);
    global.get_or_insert_with(TraceConfig::from_env).clone()
}

/// Forgets any configuration set so far; the next read consults the environment again.
pub fn reset_trace_config() {
    let mut global = GLOBAL.write().unwrap_or_else(PoisonError::into_inner);
    *global = None;
}
