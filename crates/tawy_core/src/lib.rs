//! Tawy Core Runtime
//!
//! Foundational primitives shared by the Tawy front-end crates:
//!
//! - **Events**: Input events delivered by the page host (clicks, keys, touches,
//!   pointer crossings, resource load failures)
//! - **Timers**: A single-threaded scheduler of cancellable tasks driven by a
//!   virtual clock, so time can be simulated deterministically
//!
//! # Example
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use std::time::Duration;
//! use tawy_core::TimerScheduler;
//!
//! let scheduler = TimerScheduler::new();
//! let fired = Rc::new(Cell::new(0));
//!
//! let counter = Rc::clone(&fired);
//! scheduler
//!     .set_interval(Duration::from_millis(500), move || counter.set(counter.get() + 1))
//!     .unwrap();
//!
//! scheduler.advance(Duration::from_millis(1500));
//! assert_eq!(fired.get(), 3);
//! ```

pub mod error;
pub mod events;
pub mod timer;

pub use error::{CoreError, Result};
pub use events::{Event, EventType, Key};
pub use timer::{TimerCallback, TimerId, TimerScheduler, TimerState};
