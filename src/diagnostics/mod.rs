//! Diagnostics attached to an analysis run: stage timings and per-view
//! counters.

pub mod timing;
pub mod view;

pub use timing::{StageTiming, TimingBreakdown};
pub use view::ViewReport;
