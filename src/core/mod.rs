pub mod engine;
pub mod report;
pub mod request;

pub use crate::domain::model::{
    AllocationRequest, AllocationResult, ChannelAllocation, ChannelBound, CurvePoint,
    ResponseCurve, TimeGranularity,
};
pub use crate::domain::ports::{FittedModel, ScenarioProvider};
pub use crate::utils::error::Result;
