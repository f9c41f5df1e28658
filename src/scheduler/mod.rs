//! Contest scheduler, slot assignment and KPI evaluation.
//!
//! # Pipeline
//!
//! `ContestScheduler` builds the conflict graph, colors it, and maps the
//! colors to slots of a bounded window with `SlotAssigner`. Committed
//! schedules accept late contests through `ContestScheduler::update`.
//!
//! # KPI
//!
//! `ScheduleKpi` computes conflict density, slot usage and per-slot
//! averages; `AlgorithmComparison` runs several strategies side by side.
//! `DayPlan` groups the used slots into days.
//!
//! # References
//!
//! - de Werra (1985), "An introduction to timetabling"
//! - Burke & Petrovic (2002), "Recent research directions in automated timetabling"

mod config;
mod contest_scheduler;
mod days;
mod kpi;
mod slots;

pub use config::{SchedulerConfig, DEFAULT_MAX_SLOTS_PER_DAY};
pub use contest_scheduler::{ContestScheduler, UpdateReport};
pub use days::{Day, DayPlan};
pub use kpi::{AlgorithmComparison, AlgorithmRun, ScheduleKpi};
pub use slots::SlotAssigner;
