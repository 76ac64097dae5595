pub mod config;
pub mod error;
pub mod types;

pub use config::{AiConfig, MAX_INTELLIGENCE};
pub use error::{AiError, Result};
pub use types::{BuildingType, MapPos, Mineral, PlayerIndex, SerfState, SerfType, Terrain, Tick};
