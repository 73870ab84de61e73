pub mod period;
pub mod reconstruct;
pub mod recorder;
pub mod visitor;

pub use period::{Granularity, Period};
pub use reconstruct::{Stat, StatsService};
pub use recorder::HitRecorder;
pub use visitor::VisitorContext;
