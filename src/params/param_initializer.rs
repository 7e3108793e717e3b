use rand::Rng;

use super::ParamTable;
use crate::{InitErr, Result, specs::LayerConf, storage::ParamView};

/// The name of the weights parameter.
pub const WEIGHT_KEY: &str = "weight";

/// The name of the bias parameter.
pub const BIAS_KEY: &str = "bias";

/// A `ParamInitializer` lays out a layer's parameters over its slice of the network's
/// flat parameter buffer.
pub trait ParamInitializer {
    /// Should return the amount of parameters the layer needs.
    ///
    /// # Arguments
    /// * `conf` - The layer's configuration.
    ///
    /// # Returns
    /// The amount of parameters or an error if the layer isn't supported.
    fn num_params(&self, conf: &LayerConf) -> Result<usize>;

    /// Should split `params` into the layer's named parameters.
    ///
    /// # Arguments
    /// * `conf` - The layer's configuration.
    /// * `params` - The layer's slice of the network parameters.
    /// * `initialize` - Whether to initialize the parameters or leave the values untouched.
    /// * `rng` - A random number generator.
    ///
    /// # Returns
    /// The parameter views keyed by name, in layout order.
    fn init<R: Rng + ?Sized>(
        &self,
        conf: &LayerConf,
        params: &ParamView,
        initialize: bool,
        rng: &mut R,
    ) -> Result<ParamTable>;

    /// Should split `grad` into the layer's named gradients, using the same offsets
    /// `init` uses for the parameters.
    ///
    /// # Arguments
    /// * `conf` - The layer's configuration.
    /// * `grad` - The layer's slice of the network gradients.
    ///
    /// # Returns
    /// The gradient views keyed by name, in layout order.
    fn gradients_from_flattened(&self, conf: &LayerConf, grad: &ParamView) -> Result<ParamTable>;

    /// Checks `params` is exactly as long as the layer needs.
    ///
    /// # Arguments
    /// * `conf` - The layer's configuration.
    /// * `params` - The layer's slice of the network parameters.
    ///
    /// # Returns
    /// A `SizeMismatch` error if the lengths differ.
    fn check_params(&self, conf: &LayerConf, params: &ParamView) -> Result<()> {
        let expected = self.num_params(conf)?;

        if params.len() != expected {
            return Err(InitErr::SizeMismatch {
                what: "params view",
                got: params.len(),
                expected,
            });
        }

        Ok(())
    }
}
