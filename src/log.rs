// =============================================================================
// indexheap — Debug logging
// =============================================================================
//
// Mirrors the kernel's reason for not reaching for the `log` crate: a
// no_std allocator has to be usable before any global logger could plausibly
// be installed, and it has to work on targets that have no `log` backend at
// all. So, same as the kernel's kprint!/kprintln!, output goes through a
// host-registered function pointer with a static flag + function pointer
// sink, rather than the `log` facade.
//
// Verbosity is fixed at compile time via Cargo features (`log-level-trace`
// through `log-level-error`, or `log-level-off`), matching the `debug_log_level`
// knob. Below the compiled threshold, call sites erase entirely — there is
// no per-call runtime check to skip.
// =============================================================================

use core::fmt;
use core::sync::atomic::{AtomicUsize, Ordering};

/// Severity of a log line, ordered least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

type SinkFn = fn(Level, fmt::Arguments);

fn noop_sink(_level: Level, _args: fmt::Arguments) {}

static SINK: AtomicUsize = AtomicUsize::new(noop_sink as usize);

/// Registers the host's log sink. Until called, log lines are dropped.
pub fn set_sink(sink: SinkFn) {
    SINK.store(sink as usize, Ordering::SeqCst);
}

#[doc(hidden)]
pub fn _log(level: Level, args: fmt::Arguments) {
    let addr = SINK.load(Ordering::SeqCst);
    // SAFETY: only ever stored from `SinkFn` via `set_sink`.
    let sink: SinkFn = unsafe { core::mem::transmute(addr) };
    sink(level, args);
}

/// Compiled-in verbosity threshold, derived from the `log-level-*` features.
/// Matches the spec's `debug_log_level` knob.
pub const fn enabled(level: Level) -> bool {
    #[cfg(feature = "log-level-off")]
    {
        let _ = level;
        return false;
    }
    #[cfg(feature = "log-level-trace")]
    {
        return true;
    }
    #[cfg(all(feature = "log-level-debug", not(feature = "log-level-trace")))]
    {
        return !matches!(level, Level::Trace);
    }
    #[cfg(all(
        feature = "log-level-info",
        not(any(feature = "log-level-trace", feature = "log-level-debug"))
    ))]
    {
        return matches!(level, Level::Info | Level::Warn | Level::Error);
    }
    #[cfg(all(
        feature = "log-level-warn",
        not(any(
            feature = "log-level-trace",
            feature = "log-level-debug",
            feature = "log-level-info"
        ))
    ))]
    {
        return matches!(level, Level::Warn | Level::Error);
    }
    // Default threshold, and the explicit `log-level-error` feature: only
    // errors are compiled in.
    matches!(level, Level::Error)
}

#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {
        if $crate::log::enabled($crate::log::Level::Trace) {
            $crate::log::_log($crate::log::Level::Trace, format_args!($($arg)*));
        }
    };
}

#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        if $crate::log::enabled($crate::log::Level::Debug) {
            $crate::log::_log($crate::log::Level::Debug, format_args!($($arg)*));
        }
    };
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        if $crate::log::enabled($crate::log::Level::Info) {
            $crate::log::_log($crate::log::Level::Info, format_args!($($arg)*));
        }
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        if $crate::log::enabled($crate::log::Level::Warn) {
            $crate::log::_log($crate::log::Level::Warn, format_args!($($arg)*));
        }
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        if $crate::log::enabled($crate::log::Level::Error) {
            $crate::log::_log($crate::log::Level::Error, format_args!($($arg)*));
        }
    };
}
