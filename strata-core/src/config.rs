//! Engine configuration.

use std::env;
use std::rc::Rc;
use std::str::FromStr;

use crate::error::{RenderError, Result};
use crate::host::{Host, NullHost, TracingHost};

/// How much diagnostic output the default host produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraceLevel {
    /// No diagnostics.
    Off,
    /// Root lifecycle and branch switches.
    #[default]
    Summary,
    /// Everything, including per-atom and per-poll events.
    Verbose,
}

impl FromStr for TraceLevel {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" => Ok(TraceLevel::Off),
            "summary" => Ok(TraceLevel::Summary),
            "verbose" => Ok(TraceLevel::Verbose),
            _ => Err(RenderError::InvalidTraceLevel(s.to_owned())),
        }
    }
}

/// Configuration for a [`Root`](crate::block::Root).
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub trace: TraceLevel,
}

impl Config {
    /// Environment variable holding the trace level.
    pub const TRACE_ENV: &'static str = "STRATA_TRACE";

    /// Load configuration from the environment, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        let trace = match env::var(Self::TRACE_ENV) {
            Ok(value) => value.parse()?,
            Err(_) => TraceLevel::default(),
        };
        Ok(Self { trace })
    }

    pub fn with_trace(mut self, trace: TraceLevel) -> Self {
        self.trace = trace;
        self
    }

    /// Build the host this configuration asks for.
    pub fn host(&self) -> Rc<dyn Host> {
        match TracingHost::for_level(self.trace) {
            Some(host) => Rc::new(host),
            None => Rc::new(NullHost),
        }
    }
}
