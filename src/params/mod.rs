mod element_wise;
mod param_initializer;
mod table;

pub use element_wise::ElementWiseInitializer;
pub use param_initializer::{BIAS_KEY, ParamInitializer, WEIGHT_KEY};
pub use table::ParamTable;
