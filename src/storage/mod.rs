mod buffer;
mod view;

pub use buffer::{DEFAULT_WEIGHT_INIT_ORDER, FlatBuffer, MemoryOrder};
pub use view::ParamView;
