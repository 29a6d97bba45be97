pub mod runner;

pub use runner::{CycleOutcome, RefreshScheduler, SchedulerConfig};
