use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::InitErr;

/// The closed set of weight initialization schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InitScheme {
    /// Sample from the configured distribution.
    Distribution,
    /// N(0, 2 / fan_in).
    Relu,
    /// U(-sqrt(6 / fan_in), sqrt(6 / fan_in)).
    ReluUniform,
    /// U(-r, r) with r = 4 * sqrt(6 / (fan_in + fan_out)).
    SigmoidUniform,
    /// U(-a, a) with a = 1 / sqrt(fan_in).
    Uniform,
    /// N(0, 2 / (fan_in + fan_out)).
    Xavier,
    /// U(-s, s) with s = sqrt(6) / sqrt(fan_in + fan_out), Glorot & Bengio (2010).
    XavierUniform,
    /// N(0, 1 / fan_in).
    XavierFanIn,
    /// N(0, 1 / (shape[0] + shape[1])), kept for compatibility with old configurations.
    XavierLegacy,
    /// All zeros.
    Zero,
}

impl InitScheme {
    pub const ALL: [InitScheme; 10] = [
        InitScheme::Distribution,
        InitScheme::Relu,
        InitScheme::ReluUniform,
        InitScheme::SigmoidUniform,
        InitScheme::Uniform,
        InitScheme::Xavier,
        InitScheme::XavierUniform,
        InitScheme::XavierFanIn,
        InitScheme::XavierLegacy,
        InitScheme::Zero,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            InitScheme::Distribution => "DISTRIBUTION",
            InitScheme::Relu => "RELU",
            InitScheme::ReluUniform => "RELU_UNIFORM",
            InitScheme::SigmoidUniform => "SIGMOID_UNIFORM",
            InitScheme::Uniform => "UNIFORM",
            InitScheme::Xavier => "XAVIER",
            InitScheme::XavierUniform => "XAVIER_UNIFORM",
            InitScheme::XavierFanIn => "XAVIER_FAN_IN",
            InitScheme::XavierLegacy => "XAVIER_LEGACY",
            InitScheme::Zero => "ZERO",
        }
    }
}

impl fmt::Display for InitScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InitScheme {
    type Err = InitErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InitScheme::ALL
            .into_iter()
            .find(|scheme| scheme.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| InitErr::InvalidInitScheme {
                scheme: s.to_string(),
                reason: "unknown weight init scheme",
            })
    }
}
