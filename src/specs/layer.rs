use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::{
    InitErr, Result,
    initialization::{DistributionSpec, InitScheme},
};

/// Layer selection and configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayerSpec {
    /// A layer with `n_in` inputs and `n_out` outputs.
    FeedForward(FeedForwardSpec),
    /// Pooling layer, it has no parameters.
    Subsampling { kernel: [usize; 2], stride: [usize; 2] },
    /// Dropout layer, it has no parameters.
    Dropout { rate: f32 },
}

/// Feed-forward layer specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedForwardSpec {
    pub n_in: usize,
    pub n_out: usize,
    pub weight_init: InitScheme,
    #[serde(default)]
    pub dist: Option<DistributionSpec>,
    #[serde(default)]
    pub bias_init: f32,
}

impl FeedForwardSpec {
    /// Creates a new `FeedForwardSpec` with no distribution and zeroed biases.
    pub fn new(n_in: usize, n_out: usize, weight_init: InitScheme) -> Self {
        Self {
            n_in,
            n_out,
            weight_init,
            dist: None,
            bias_init: 0.,
        }
    }

    pub fn with_dist(mut self, dist: DistributionSpec) -> Self {
        self.dist = Some(dist);
        self
    }

    pub fn with_bias_init(mut self, bias_init: f32) -> Self {
        self.bias_init = bias_init;
        self
    }
}

impl LayerSpec {
    /// The name of the layer kind, used for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            LayerSpec::FeedForward(_) => "feed_forward",
            LayerSpec::Subsampling { .. } => "subsampling",
            LayerSpec::Dropout { .. } => "dropout",
        }
    }
}

/// The configuration of a single layer.
///
/// Besides the read-only `LayerSpec` it keeps track of the names of the variables
/// registered as trainable, in order of first registration.
#[derive(Debug)]
pub struct LayerConf {
    layer: LayerSpec,
    variables: Mutex<Vec<String>>,
}

impl LayerConf {
    /// Creates a new `LayerConf`.
    ///
    /// # Arguments
    /// * `layer` - The layer specification.
    ///
    /// # Returns
    /// A new `LayerConf` instance.
    pub fn new(layer: LayerSpec) -> Self {
        Self {
            layer,
            variables: Mutex::new(Vec::new()),
        }
    }

    /// Parses a `LayerConf` from a json layer specification.
    ///
    /// # Arguments
    /// * `json` - The serialized `LayerSpec`.
    ///
    /// # Returns
    /// The configuration or a `Config` error if the document is invalid.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn layer(&self) -> &LayerSpec {
        &self.layer
    }

    /// Returns the feed-forward specification of this layer.
    ///
    /// # Returns
    /// An `UnsupportedLayerType` error if this isn't a feed-forward layer.
    pub fn feed_forward(&self) -> Result<&FeedForwardSpec> {
        match &self.layer {
            LayerSpec::FeedForward(spec) => Ok(spec),
            other => Err(InitErr::UnsupportedLayerType { kind: other.kind() }),
        }
    }

    /// Registers `name` as a trainable variable, repeated names are ignored.
    pub fn add_variable(&self, name: &str) {
        let mut variables = self.variables.lock();
        if !variables.iter().any(|v| v == name) {
            variables.push(name.to_string());
        }
    }

    /// Returns the names of the trainable variables.
    pub fn variables(&self) -> Vec<String> {
        self.variables.lock().clone()
    }
}

impl From<LayerSpec> for LayerConf {
    fn from(layer: LayerSpec) -> Self {
        Self::new(layer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_feed_forward() {
        let json = r#"{
            "type": "feed_forward",
            "n_in": 4,
            "n_out": 3,
            "weight_init": "XAVIER_UNIFORM",
            "bias_init": 0.5
        }"#;

        let conf = LayerConf::from_json(json).unwrap();
        let spec = conf.feed_forward().unwrap();

        assert_eq!(
            *spec,
            FeedForwardSpec::new(4, 3, InitScheme::XavierUniform).with_bias_init(0.5)
        );
    }

    #[test]
    fn parse_with_distribution() {
        let json = r#"{
            "type": "feed_forward",
            "n_in": 2,
            "n_out": 2,
            "weight_init": "DISTRIBUTION",
            "dist": { "type": "uniform", "lower": -1.0, "upper": 1.0 }
        }"#;

        let conf = LayerConf::from_json(json).unwrap();
        let spec = conf.feed_forward().unwrap();

        assert_eq!(
            spec.dist,
            Some(DistributionSpec::Uniform {
                lower: -1.,
                upper: 1.
            })
        );
        assert_eq!(spec.bias_init, 0.);
    }

    #[test]
    fn invalid_documents() {
        let unknown_scheme = r#"{ "type": "feed_forward", "n_in": 2, "n_out": 2, "weight_init": "LECUN" }"#;
        assert!(matches!(
            LayerConf::from_json(unknown_scheme),
            Err(InitErr::Config(_))
        ));

        assert!(matches!(
            LayerConf::from_json("{ \"type\": \"feed_forward\" }"),
            Err(InitErr::Config(_))
        ));
    }

    #[test]
    fn unsupported_layer() {
        let conf = LayerConf::new(LayerSpec::Dropout { rate: 0.5 });
        assert_eq!(
            conf.feed_forward().unwrap_err(),
            InitErr::UnsupportedLayerType { kind: "dropout" }
        );
    }

    #[test]
    fn variables_keep_first_registration_order() {
        let conf = LayerConf::new(LayerSpec::FeedForward(FeedForwardSpec::new(
            1,
            1,
            InitScheme::Zero,
        )));

        conf.add_variable("weight");
        conf.add_variable("bias");
        conf.add_variable("weight");

        assert_eq!(conf.variables(), ["weight", "bias"]);
    }
}
