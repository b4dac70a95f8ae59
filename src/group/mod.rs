//! Group Module
//!
//! Named cache groups and the registry that owns them.

mod getter;
mod instance;
mod registry;
mod stats;

pub use getter::{Getter, GetterFn};
pub use instance::Group;
pub use registry::Registry;
pub use stats::{GroupStats, GroupStatsSnapshot};
