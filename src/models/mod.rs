//! Contest scheduling domain models.
//!
//! Plain data types shared by the graph, coloring and scheduling layers.
//! All records are serde-serializable; the serialization format itself is
//! the caller's choice.
//!
//! # Domain Mappings
//!
//! | u-contest | Graph theory | Timetabling |
//! |-----------|--------------|-------------|
//! | Contest | Node | Event |
//! | Conflict | Edge | Clash |
//! | Color | Color class | Period |
//! | Slot | - | Concrete time period |

mod coloring;
mod contest;
mod schedule;
mod slot;
mod window;

pub use coloring::{Color, Coloring};
pub use contest::Contest;
pub use schedule::{ScheduleResult, ScheduleStatus, ScheduledContest};
pub use slot::{Slot, SlotConfig, SlotMap};
pub use window::TimeWindow;
