//! Diagnostic host.
//!
//! The core reports what it is doing to a [`Host`]: where each render pass,
//! atom, or branch switch begins and ends, plus leveled log lines. Hosts are
//! purely diagnostic and can be replaced by [`NullHost`] without changing
//! any output.

use std::cell::Cell;
use std::fmt;
use std::panic::Location;
use std::rc::Rc;

use crate::config::TraceLevel;

/// Severity of a host log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// Per-atom and per-poll chatter.
    Trace,
    /// Structural events such as branch switches.
    Debug,
    /// Root lifecycle.
    Info,
}

/// Where in user code an output operation was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceInfo {
    location: &'static Location<'static>,
}

impl SourceInfo {
    /// Capture the location of the caller.
    #[track_caller]
    pub fn caller() -> Self {
        Self {
            location: Location::caller(),
        }
    }

    pub fn file(&self) -> &'static str {
        self.location.file()
    }

    pub fn line(&self) -> u32 {
        self.location.line()
    }
}

impl fmt::Display for SourceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.location.file(),
            self.location.line(),
            self.location.column()
        )
    }
}

/// Structured description of the operation being reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Render,
    Rerender,
    Unmount,
    Atom(SourceInfo),
    Effect(SourceInfo),
    Open,
    Dynamic,
    Switch,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Render => f.write_str("render"),
            Operation::Rerender => f.write_str("rerender"),
            Operation::Unmount => f.write_str("unmount"),
            Operation::Atom(source) => write!(f, "atom @ {source}"),
            Operation::Effect(source) => write!(f, "effect @ {source}"),
            Operation::Open => f.write_str("open"),
            Operation::Dynamic => f.write_str("dynamic"),
            Operation::Switch => f.write_str("switch"),
        }
    }
}

/// Receiver for diagnostic output.
pub trait Host {
    fn begin(&self, operation: &Operation);

    fn end(&self, operation: &Operation);

    fn log(&self, level: Level, operation: &Operation, message: &str);
}

/// A host that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHost;

impl Host for NullHost {
    fn begin(&self, _operation: &Operation) {}

    fn end(&self, _operation: &Operation) {}

    fn log(&self, _level: Level, _operation: &Operation, _message: &str) {}
}

/// An open `begin`/`end` pair.
///
/// `end` is reported when the scope is dropped, so early returns and
/// unwinding still close what they opened.
pub struct Scope {
    host: Rc<dyn Host>,
    operation: Operation,
}

impl Scope {
    /// Report `begin` for `operation` on `host`.
    pub fn enter(host: &Rc<dyn Host>, operation: Operation) -> Self {
        host.begin(&operation);
        Self {
            host: Rc::clone(host),
            operation,
        }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        self.host.end(&self.operation);
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("operation", &self.operation)
            .finish()
    }
}

/// A host that emits `tracing` events.
///
/// `begin`/`end` pairs nest; the current nesting depth is attached to every
/// event so subscribers can indent.
#[derive(Debug)]
pub struct TracingHost {
    threshold: Level,
    depth: Cell<usize>,
}

impl TracingHost {
    pub fn new(threshold: Level) -> Self {
        Self {
            threshold,
            depth: Cell::new(0),
        }
    }

    /// Build a host for the configured trace level.
    ///
    /// Returns `None` for [`TraceLevel::Off`].
    pub fn for_level(level: TraceLevel) -> Option<Self> {
        match level {
            TraceLevel::Off => None,
            TraceLevel::Summary => Some(Self::new(Level::Debug)),
            TraceLevel::Verbose => Some(Self::new(Level::Trace)),
        }
    }

    pub fn depth(&self) -> usize {
        self.depth.get()
    }

    fn emit(&self, level: Level, operation: &Operation, message: &str) {
        if level < self.threshold {
            return;
        }
        let depth = self.depth.get();
        match level {
            Level::Trace => tracing::trace!(op = %operation, depth, "{message}"),
            Level::Debug => tracing::debug!(op = %operation, depth, "{message}"),
            Level::Info => tracing::info!(op = %operation, depth, "{message}"),
        }
    }

    fn level_of(operation: &Operation) -> Level {
        match operation {
            Operation::Render | Operation::Rerender | Operation::Unmount => Level::Debug,
            _ => Level::Trace,
        }
    }
}

impl Host for TracingHost {
    fn begin(&self, operation: &Operation) {
        self.emit(Self::level_of(operation), operation, "begin");
        self.depth.set(self.depth.get() + 1);
    }

    fn end(&self, operation: &Operation) {
        self.depth.set(self.depth.get().saturating_sub(1));
        self.emit(Self::level_of(operation), operation, "end");
    }

    fn log(&self, level: Level, operation: &Operation, message: &str) {
        self.emit(level, operation, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_info_points_at_caller() {
        let line = line!() + 1;
        let source = SourceInfo::caller();

        assert!(source.file().ends_with("host.rs"));
        assert_eq!(source.line(), line);
    }

    #[test]
    fn operation_display_includes_source() {
        let source = SourceInfo::caller();
        let text = Operation::Atom(source).to_string();

        assert!(text.starts_with("atom @ "));
        assert!(text.contains("host.rs"));
    }

    #[test]
    fn tracing_host_tracks_depth() {
        let host = TracingHost::new(Level::Trace);

        host.begin(&Operation::Render);
        host.begin(&Operation::Dynamic);
        assert_eq!(host.depth(), 2);

        host.end(&Operation::Dynamic);
        host.end(&Operation::Render);
        assert_eq!(host.depth(), 0);
    }

    #[test]
    fn scope_ends_on_early_return() {
        let tracing = Rc::new(TracingHost::new(Level::Trace));
        let host: Rc<dyn Host> = tracing.clone();

        fn fails(host: &Rc<dyn Host>) -> Result<(), ()> {
            let _scope = Scope::enter(host, Operation::Switch);
            Err(())
        }

        let outer = Scope::enter(&host, Operation::Rerender);
        assert!(fails(&host).is_err());
        assert_eq!(tracing.depth(), 1);

        drop(outer);
        assert_eq!(tracing.depth(), 0);
    }

    #[test]
    fn off_level_has_no_tracing_host() {
        assert!(TracingHost::for_level(TraceLevel::Off).is_none());
        assert!(TracingHost::for_level(TraceLevel::Verbose).is_some());
    }
}
