//! # IntervalCards Scheduler
//!
//! One background job per learning user. Jobs live only in memory; the
//! store's `start_learn` users are the source of truth and `resume_all`
//! rebuilds the registry from them after a restart.
//!
//! ```text
//! SchedulerRegistry
//!   ├── user 42: DaytimeInterval(every 2h, 09:00–22:00 UTC+2) → tick
//!   ├── user 77: FixedPeriod(5s)                               → tick
//!   └── tick: list_words → random entry → Outbound::send
//! ```

pub mod format;
pub mod policy;
pub mod registry;

pub use format::format_word;
pub use policy::FiringPolicy;
pub use registry::{JobInfo, SchedulerRegistry, deliver_tick};
