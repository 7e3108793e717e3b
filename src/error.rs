use std::{
    error::Error,
    fmt::{self, Display},
};

use rand_distr::{NormalError, uniform::Error as UniformError};

/// The result type used in the entire crate.
pub type Result<T> = std::result::Result<T, InitErr>;

/// The parameter initialization error type.
#[derive(Debug, Clone, PartialEq)]
pub enum InitErr {
    UnsupportedLayerType {
        kind: &'static str,
    },
    SizeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    LengthMismatch {
        view_len: usize,
        flat_len: usize,
        shape: Vec<usize>,
    },
    InvalidInitScheme {
        scheme: String,
        reason: &'static str,
    },
    InvalidDistribution(String),
    Config(String),
    Overflow {
        what: &'static str,
    },
}

impl From<NormalError> for InitErr {
    fn from(value: NormalError) -> Self {
        Self::InvalidDistribution(value.to_string())
    }
}

impl From<UniformError> for InitErr {
    fn from(value: UniformError) -> Self {
        Self::InvalidDistribution(value.to_string())
    }
}

impl From<rand_distr::BinomialError> for InitErr {
    fn from(value: rand_distr::BinomialError) -> Self {
        Self::InvalidDistribution(value.to_string())
    }
}

impl From<serde_json::Error> for InitErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Config(value.to_string())
    }
}

impl Display for InitErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InitErr::UnsupportedLayerType { kind } => {
                format!("Unsupported layer type: {kind}, expected a feed forward layer")
            }
            InitErr::SizeMismatch {
                what,
                got,
                expected,
            } => format!("Expected {what} of length {expected}, got length {got}"),
            InitErr::LengthMismatch {
                view_len,
                flat_len,
                shape,
            } => format!(
                "Parameter view length does not match initialized weights length (view length: {view_len}, flattened length: {flat_len}, raw shape: {shape:?})"
            ),
            InitErr::InvalidInitScheme { scheme, reason } => {
                format!("Illegal weight init value {scheme}: {reason}")
            }
            InitErr::InvalidDistribution(msg) => format!("Invalid distribution: {msg}"),
            InitErr::Config(msg) => format!("Invalid layer configuration: {msg}"),
            InitErr::Overflow { what } => format!("The length of the {what} overflows usize"),
        };

        write!(f, "{s}")
    }
}

impl Error for InitErr {}
