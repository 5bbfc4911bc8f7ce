//! # Weekplan Core Library
//!
//! Core logic for a personal weekly planner: day cards with three priorities
//! and a task list, a habit grid, reminders and a motivational quote, stored
//! as one snapshot per calendar week. The `weekplan` CLI is a thin layer over
//! this crate.
//!
//! ## Architecture
//!
//! - **Week resolver** ([`week`]): signed week offsets to Saturday-first date
//!   windows and storage keys
//! - **Planning model** ([`model`], [`planner`]): week data and pure edits
//! - **Storage** ([`storage`]): key-value snapshots in SQLite
//! - **Quotes** ([`quote`]): injectable provider with single-flight and
//!   fallback handling
//! - **Session** ([`session`]): the open week and the user-facing commands

pub mod config;
pub mod error;
pub mod model;
pub mod planner;
pub mod quote;
pub mod session;
pub mod storage;
pub mod week;

pub use config::Config;
pub use error::{ConfigError, CoreError, PlanError, QuoteError, QuoteRequestError, StoreError};
pub use model::{DayData, DayIndex, Event, Habit, IdGenerator, PrioritySlot, Task, UuidIds, WeekData};
pub use planner::{apply, progress, PlanEdit, TaskPatch};
pub use quote::{GeminiProvider, QuoteProvider, QuoteService};
pub use session::PlannerSession;
pub use storage::{KvStore, MemoryKv, SqliteKv, WeekStore};
pub use week::{WeekKey, WeekWindow};
