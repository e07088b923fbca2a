pub mod config;
pub mod core;
pub mod domain;
pub mod model;
pub mod utils;

pub use config::{scenario::TomlScenario, CliConfig};
pub use core::{engine::AllocationEngine, request::AllocationRequestBuilder};
pub use domain::ports::{FittedModel, ScenarioProvider};
pub use model::ArtifactModel;
pub use utils::error::{AllocError, Result};
