//! Human-readable, trace-augmented rendering of an error chain.
//!
//! Each wrapped layer goes on its own line, one level deeper than the layer
//! that wraps it, with that layer's trace printed beneath its message:
//!
//! ```text
//! loading user 42
//!     Users::load  src/users.rs:88
//!     handle_get   src/http.rs:31
//!   connection refused
//!       Pool::get  src/db.rs:12
//! ```
//!
//! Aggregates list each failed slot by index. This output is for people; the
//! single-line `Display` of each type is the machine-log form.

use std::error::Error;
use std::fmt::Write;

use crate::types::errs::Errs;
use crate::types::trace::INDENT;
use crate::types::trace_config::TraceConfig;
use crate::types::traced_error::TracedError;

/// Renders `err` and everything below it, with traces, using `config`.
pub fn render_with_trace(err: &(dyn Error + 'static), config: &TraceConfig) -> String {
    let mut out = String::new();
    write_layer(&mut out, err, config, 0);
    out.truncate(out.trim_end().len());
    out
}

fn write_layer(out: &mut String, err: &(dyn Error + 'static), config: &TraceConfig, indent: usize) {
    let pad = INDENT.repeat(indent);

    if let Some(traced) = err.downcast_ref::<TracedError>() {
        match traced.msg() {
            Some(msg) => {
                let _ = writeln!(out, "{pad}{msg}");
                write_trace(out, traced, config, indent);
                if let Some(cause) = traced.cause() {
                    write_layer(out, &**cause, config, indent + 1);
                }
            },
            None => {
                if let Some(cause) = traced.cause() {
                    write_layer(out, &**cause, config, indent);
                }
                write_trace(out, traced, config, indent);
            },
        }
        return;
    }

    if let Some(errs) = err.downcast_ref::<Errs>() {
        let _ = writeln!(out, "{pad}{} errors:", errs.failed());
        for (index, member) in errs.iter().enumerate() {
            if let Some(member) = member {
                let _ = writeln!(out, "{pad}{INDENT}[{index}]");
                write_layer(out, &**member, config, indent + 2);
            }
        }
        return;
    }

    let _ = writeln!(out, "{pad}{err}");
    if let Some(source) = err.source() {
        write_layer(out, source, config, indent + 1);
    }
}

fn write_trace(out: &mut String, traced: &TracedError, config: &TraceConfig, indent: usize) {
    if let Some(trace) = traced.trace() {
        out.push_str(&trace.render_with(config, indent + 2));
    }
}
