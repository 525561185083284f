//! Depreciation schedule generation and simulation.
//!
//! Schedules are computed wholesale from asset parameters and regenerated
//! from scratch on every parameter change; there is no incremental patching.
//! A bounded simulation variant runs the same per-period math over an
//! explicit date window without persisting anything.

pub mod error;
pub mod schedule;
pub mod simulation;
pub mod types;

pub use error::DepreciationError;
pub use schedule::ScheduleGenerator;
pub use simulation::{MAX_MONTHLY_PERIODS, MAX_YEARLY_PERIODS, SimulationRequest, simulate};
pub use types::{
    AssetCategory, DepreciationBasis, DepreciationClass, DepreciationMethod, DepreciationParams,
    ScheduleRow, ScheduleSummary,
};
