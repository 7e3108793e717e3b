//! Lays out element-wise layer parameters over a network's flat parameter buffer and
//! fills them with their initial values.

pub mod error;
pub mod initialization;
pub mod params;
pub mod specs;
pub mod storage;

pub use error::{InitErr, Result};
pub use initialization::{DistributionSpec, InitScheme, WeightInit};
pub use params::{BIAS_KEY, ElementWiseInitializer, ParamInitializer, ParamTable, WEIGHT_KEY};
pub use specs::{FeedForwardSpec, LayerConf, LayerSpec};
pub use storage::{DEFAULT_WEIGHT_INIT_ORDER, FlatBuffer, MemoryOrder, ParamView};
