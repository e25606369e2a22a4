//! Single-use scoped timer

use std::io::{self, Stdout, Write};
use std::time::Duration;

use perftools_config::TimerConfig;
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::TimerError;
use crate::report;

/// Lifecycle of a [`TimerContext`]. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Unstarted,
    Active,
    Finished,
}

/// Measures one scoped region of work.
///
/// Timestamps are only recorded in verbose mode; a quiet timer is a no-op
/// wrapper whose timing fields stay `None`.
pub struct TimerContext<W: Write = Stdout, C: Clock = SystemClock> {
    name: String,
    verbose: bool,
    state: TimerState,
    start_time: Option<f64>,
    end_time: Option<f64>,
    elapsed_time: Option<f64>,
    sink: W,
    clock: C,
}

impl TimerContext {
    /// Create a verbose timer reporting to standard output.
    pub fn new(label: impl AsRef<str>) -> Self {
        Self::with_verbose(label, true)
    }

    pub fn with_verbose(label: impl AsRef<str>, verbose: bool) -> Self {
        Self {
            name: report::normalize_label(label.as_ref()),
            verbose,
            state: TimerState::Unstarted,
            start_time: None,
            end_time: None,
            elapsed_time: None,
            sink: io::stdout(),
            clock: SystemClock::new(),
        }
    }

    pub fn from_config(label: impl AsRef<str>, config: &TimerConfig) -> Self {
        Self::with_verbose(label, config.verbose)
    }
}

impl<W: Write, C: Clock> TimerContext<W, C> {
    /// Replace the output stream the report lines are written to.
    pub fn with_sink<S: Write>(self, sink: S) -> TimerContext<S, C> {
        TimerContext {
            name: self.name,
            verbose: self.verbose,
            state: self.state,
            start_time: self.start_time,
            end_time: self.end_time,
            elapsed_time: self.elapsed_time,
            sink,
            clock: self.clock,
        }
    }

    pub fn with_clock<K: Clock>(self, clock: K) -> TimerContext<W, K> {
        TimerContext {
            name: self.name,
            verbose: self.verbose,
            state: self.state,
            start_time: self.start_time,
            end_time: self.end_time,
            elapsed_time: self.elapsed_time,
            sink: self.sink,
            clock,
        }
    }

    /// Upper-cased display label
    pub fn label(&self) -> &str {
        &self.name
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Entry timestamp in seconds since the Unix epoch
    pub fn start_time(&self) -> Option<f64> {
        self.start_time
    }

    /// Exit timestamp in seconds since the Unix epoch
    pub fn end_time(&self) -> Option<f64> {
        self.end_time
    }

    /// Seconds between entry and exit, set once the scope has ended
    pub fn elapsed(&self) -> Option<f64> {
        self.elapsed_time
    }

    pub fn elapsed_duration(&self) -> Option<Duration> {
        self.elapsed_time
            .map(|secs| Duration::from_secs_f64(secs.max(0.0)))
    }

    pub fn into_sink(self) -> W {
        self.sink
    }

    /// Open the measured scope. The scope ends when the returned guard is
    /// dropped, whichever way control leaves the block.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::AlreadyFinished`] if this timer has already
    /// measured a scope.
    pub fn enter(&mut self) -> Result<ActiveTimer<'_, W, C>, TimerError> {
        if self.state != TimerState::Unstarted {
            return Err(TimerError::AlreadyFinished {
                label: self.name.clone(),
            });
        }
        Ok(self.begin())
    }

    /// Run `f` inside the measured scope and hand back its output untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::AlreadyFinished`] without calling `f` if this
    /// timer has already measured a scope.
    pub fn measure<T, F>(&mut self, f: F) -> Result<T, TimerError>
    where
        F: FnOnce() -> T,
    {
        let _scope = self.enter()?;
        Ok(f())
    }

    fn begin(&mut self) -> ActiveTimer<'_, W, C> {
        self.state = TimerState::Active;

        if self.verbose {
            self.start_time = Some(self.clock.now());
            let line = report::start_marker(&self.name, self.clock.local_time());
            self.emit(&line);
        }

        debug!(label = %self.name, verbose = self.verbose, "timer started");
        ActiveTimer { timer: self }
    }

    fn finish(&mut self) {
        if self.state != TimerState::Active {
            return;
        }
        self.state = TimerState::Finished;

        if self.verbose {
            let end = self.clock.now();
            self.end_time = Some(end);
            if let Some(start) = self.start_time {
                self.elapsed_time = Some(end - start);
            }

            let end_line = report::end_marker(&self.name, self.clock.local_time());
            self.emit(&end_line);
            let summary = report::cost_summary(&self.name, self.elapsed_time.unwrap_or_default());
            self.emit(&summary);
        }

        debug!(label = %self.name, elapsed = ?self.elapsed_time, "timer finished");
    }

    fn emit(&mut self, line: &str) {
        let written = writeln!(self.sink, "{line}").and_then(|()| self.sink.flush());
        if let Err(err) = written {
            warn!(label = %self.name, error = %err, "failed to write timer report");
        }
    }
}

/// Guard for an active measurement; dropping it ends the scope.
#[must_use = "the measured scope ends as soon as the guard is dropped"]
pub struct ActiveTimer<'a, W: Write = Stdout, C: Clock = SystemClock> {
    timer: &'a mut TimerContext<W, C>,
}

impl<W: Write, C: Clock> ActiveTimer<'_, W, C> {
    pub fn label(&self) -> &str {
        self.timer.label()
    }

    pub fn start_time(&self) -> Option<f64> {
        self.timer.start_time
    }

    /// Seconds since entry, without ending the scope
    pub fn elapsed_so_far(&self) -> Option<f64> {
        self.timer
            .start_time
            .map(|start| self.timer.clock.now() - start)
    }

    /// End the scope now instead of at the end of the block. Consuming the
    /// guard runs its `Drop`, which writes the end marker and summary.
    pub fn finish(self) {
        drop(self);
    }
}

impl<W: Write, C: Clock> Drop for ActiveTimer<'_, W, C> {
    fn drop(&mut self) {
        self.timer.finish();
    }
}

/// Measure `f` with a fresh verbose timer reporting to standard output.
pub fn time_scope<T, F>(label: &str, f: F) -> T
where
    F: FnOnce() -> T,
{
    let mut timer = TimerContext::new(label);
    let _scope = timer.begin();
    f()
}
