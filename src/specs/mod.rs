mod layer;

pub use layer::{FeedForwardSpec, LayerConf, LayerSpec};
