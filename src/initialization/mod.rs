mod distribution;
mod scheme;
mod weight_init;

pub use distribution::DistributionSpec;
pub use scheme::InitScheme;
pub use weight_init::{WeightInit, flatten};
