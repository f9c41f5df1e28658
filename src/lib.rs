//! Contest slot scheduling via conflict-graph coloring.
//!
//! Contests whose time windows clash become adjacent nodes of a conflict
//! graph. A proper coloring of that graph groups contests that may share a
//! slot; colors are then mapped to concrete slots of a bounded window.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Contest`, `TimeWindow`, `Coloring`,
//!   `Slot`, `SlotConfig`, `SlotMap`, `ScheduleResult`
//! - **`validation`**: Input integrity checks (intervals, empty and duplicate IDs)
//! - **`graph`**: `ConflictGraph` and pluggable conflict predicates
//! - **`coloring`**: Greedy, Welsh-Powell, DSatur and budgeted exact search
//! - **`dynamic`**: Incremental insertion with local patching
//! - **`scheduler`**: `ContestScheduler`, slot assignment, KPIs, day plans
//! - **`priority`**: Platform- and duration-based priorities
//!
//! # Example
//!
//! ```
//! use u_contest::models::{Contest, SlotConfig};
//! use u_contest::scheduler::ContestScheduler;
//!
//! let contests = vec![
//!     Contest::new("A", 0, 60),
//!     Contest::new("B", 30, 90),
//!     Contest::new("C", 100, 160),
//! ];
//! let result = ContestScheduler::new(SlotConfig::new(0, 600, 100))
//!     .schedule(&contests)
//!     .unwrap();
//!
//! assert_eq!(result.width(), 2);
//! assert_eq!(result.slot_of("A"), result.slot_of("C"));
//! ```
//!
//! # Logging
//!
//! The crate logs through the `log` facade and installs no logger.
//!
//! # References
//!
//! - Welsh & Powell (1967), "An upper bound for the chromatic number of a graph"
//! - Brélaz (1979), "New methods to color the vertices of a graph"
//! - de Werra (1985), "An introduction to timetabling"

pub mod coloring;
pub mod dynamic;
pub mod error;
pub mod graph;
pub mod models;
pub mod priority;
pub mod scheduler;
pub mod validation;

pub use error::{Result, ScheduleError};
