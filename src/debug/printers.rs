// src/debug/printers.rs

//! Macros for printing error messages and the run-time search narration
//! to stderr.
//!
//! Compile-time developer tracing throughout this crate uses
//! [`si_trace_print`] and is only built into debug builds. The [`vo!`]
//! narration here is different: it is compiled into all builds and gated
//! at run-time on [`verbose_enabled`], so CLI option `--debug` works in
//! release builds. Narration goes to stderr, never mixing with the
//! streamed log lines on stdout.
//!
//! [`si_trace_print`]: https://docs.rs/si_trace_print
//! [`vo!`]: crate::debug::printers::vo
//! [`verbose_enabled`]: crate::common::verbose_enabled

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `e`println! an `err`or
#[macro_export]
macro_rules! e_err {
    (
        $($args:tt)*
    ) => {
        {
            eprint!("ERROR: ");
            eprintln!($($args)*)
        }
    }
}
pub use e_err;

/// `v`erbose eprintln! `o`rdinary message; the line-by-line search narration.
///
/// Prints only when [`verbose_enabled`] (CLI option `--debug`).
///
/// [`verbose_enabled`]: crate::common::verbose_enabled
#[macro_export]
macro_rules! vo {
    (
        $($args:tt)*
    ) => {
        {
            if $crate::common::verbose_enabled() {
                eprintln!($($args)*);
            }
        }
    }
}
pub use vo;
