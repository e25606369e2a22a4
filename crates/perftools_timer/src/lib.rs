//! Scoped wall-clock timing
//!
//! A [`TimerContext`] brackets a block of work: entering it prints a start
//! marker, leaving it (normally, through `?`, or while unwinding from a panic)
//! prints an end marker and the elapsed cost.
//!
//! ```no_run
//! use perftools_timer::TimerContext;
//!
//! let mut timer = TimerContext::new("sleep");
//! {
//!     let _scope = timer.enter()?;
//!     std::thread::sleep(std::time::Duration::from_secs(2));
//! }
//! assert!(timer.elapsed().unwrap() >= 2.0);
//! # Ok::<(), perftools_timer::TimerError>(())
//! ```

pub mod clock;
pub mod context;
pub mod error;
pub mod report;

pub use clock::{Clock, SystemClock};
pub use context::{ActiveTimer, TimerContext, TimerState, time_scope};
pub use error::TimerError;
