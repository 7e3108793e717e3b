use log::trace;
use ndarray::{ArrayD, IxDyn, Shape, ShapeBuilder};
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::{StandardNormal, Uniform};

use super::{DistributionSpec, InitScheme};
use crate::{
    InitErr, Result,
    storage::{MemoryOrder, ParamView},
};

const MISSING_DIST: &str = "the distribution scheme requires a distribution";

/// Fills parameter views with values drawn according to an `InitScheme`.
///
/// The generated array is laid out and flattened in `order`, which must be the order
/// the consumer of the view expects, otherwise weights silently end up connected to the
/// wrong inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightInit<'a> {
    pub fan_in: f32,
    pub fan_out: f32,
    pub scheme: InitScheme,
    pub dist: Option<&'a DistributionSpec>,
    pub order: MemoryOrder,
}

impl<'a> WeightInit<'a> {
    /// Creates a new `WeightInit` without a distribution.
    ///
    /// # Arguments
    /// * `fan_in` - The number of input connections of a unit.
    /// * `fan_out` - The number of output connections of a unit.
    /// * `scheme` - The initialization scheme.
    /// * `order` - The memory order used for generation and flattening.
    ///
    /// # Returns
    /// A new `WeightInit` instance.
    pub fn new(fan_in: f32, fan_out: f32, scheme: InitScheme, order: MemoryOrder) -> Self {
        Self {
            fan_in,
            fan_out,
            scheme,
            dist: None,
            order,
        }
    }

    /// Sets the distribution sampled by the `Distribution` scheme.
    pub fn with_dist(mut self, dist: Option<&'a DistributionSpec>) -> Self {
        self.dist = dist;
        self
    }

    /// Checks that the scheme can generate an array of the given shape.
    ///
    /// # Arguments
    /// * `shape` - The dimensions of the raw array.
    ///
    /// # Returns
    /// An `InvalidInitScheme` error if the scheme can't be used for this shape.
    pub fn validate(&self, shape: &[usize]) -> Result<()> {
        match self.scheme {
            InitScheme::Distribution if self.dist.is_none() => Err(self.invalid(MISSING_DIST)),
            InitScheme::XavierLegacy if shape.len() < 2 => Err(self.invalid(
                "the legacy xavier scheme requires a shape of at least two dimensions",
            )),
            _ => Ok(()),
        }
    }

    fn invalid(&self, reason: &'static str) -> InitErr {
        InitErr::InvalidInitScheme {
            scheme: self.scheme.to_string(),
            reason,
        }
    }

    /// Generates a new array of the given shape following the scheme.
    ///
    /// # Arguments
    /// * `shape` - The dimensions of the array.
    /// * `rng` - A random number generator.
    ///
    /// # Returns
    /// The generated array laid out in this initializer's memory order.
    pub fn generate<R: Rng + ?Sized>(&self, shape: &[usize], rng: &mut R) -> Result<ArrayD<f32>> {
        self.validate(shape)?;

        let dim = IxDyn(shape).set_f(self.order.is_column_major());

        if shape.iter().product::<usize>() == 0 {
            return Ok(ArrayD::zeros(dim));
        }

        let (fan_in, fan_out) = (self.fan_in, self.fan_out);

        match self.scheme {
            InitScheme::Distribution => self
                .dist
                .ok_or_else(|| self.invalid(MISSING_DIST))?
                .sample(shape, self.order, rng),
            InitScheme::Relu => standard_normal(dim, (2. / fan_in).sqrt(), rng),
            InitScheme::ReluUniform => uniform(dim, (6. / fan_in).sqrt(), rng),
            InitScheme::SigmoidUniform => uniform(dim, 4. * (6. / (fan_in + fan_out)).sqrt(), rng),
            InitScheme::Uniform => uniform(dim, 1. / fan_in.sqrt(), rng),
            InitScheme::Xavier => standard_normal(dim, (2. / (fan_in + fan_out)).sqrt(), rng),
            InitScheme::XavierUniform => {
                uniform(dim, 6f32.sqrt() / (fan_in + fan_out).sqrt(), rng)
            }
            InitScheme::XavierFanIn => standard_normal(dim, 1. / fan_in.sqrt(), rng),
            InitScheme::XavierLegacy => {
                standard_normal(dim, 1. / ((shape[0] + shape[1]) as f32).sqrt(), rng)
            }
            InitScheme::Zero => Ok(ArrayD::zeros(dim)),
        }
    }

    /// Generates weights of the given shape and copies them into `view`.
    ///
    /// # Arguments
    /// * `shape` - The dimensions of the raw weights array.
    /// * `view` - The destination of the flattened weights.
    /// * `rng` - A random number generator.
    ///
    /// # Returns
    /// The populated view, or an error, in which case `view` is left untouched.
    pub fn init<R: Rng + ?Sized>(
        &self,
        shape: &[usize],
        view: ParamView,
        rng: &mut R,
    ) -> Result<ParamView> {
        trace!(
            scheme = self.scheme.as_str(),
            column_major = self.order.is_column_major(),
            len = view.len();
            "initializing weights"
        );

        let raw = self.generate(shape, rng)?;
        let flat = flatten(&raw, self.order);

        if flat.len() != view.len() {
            return Err(InitErr::LengthMismatch {
                view_len: view.len(),
                flat_len: flat.len(),
                shape: raw.shape().to_vec(),
            });
        }

        view.assign(&flat)?;
        Ok(view)
    }
}

/// Flattens an array into a vec following the given memory order.
///
/// # Arguments
/// * `arr` - The array to flatten.
/// * `order` - `RowMajor` walks the last axis fastest, `ColumnMajor` the first one.
///
/// # Returns
/// The flattened elements.
pub fn flatten(arr: &ArrayD<f32>, order: MemoryOrder) -> Vec<f32> {
    match order {
        MemoryOrder::RowMajor => arr.iter().copied().collect(),
        MemoryOrder::ColumnMajor => arr.t().iter().copied().collect(),
    }
}

fn standard_normal<R: Rng + ?Sized>(
    dim: Shape<IxDyn>,
    scale: f32,
    rng: &mut R,
) -> Result<ArrayD<f32>> {
    if !scale.is_finite() {
        return Err(InitErr::InvalidDistribution(format!(
            "non finite standard deviation {scale}"
        )));
    }

    let arr: ArrayD<f32> = ArrayD::random_using(dim, StandardNormal, rng);
    Ok(arr.mapv_into(|x| x * scale))
}

fn uniform<R: Rng + ?Sized>(dim: Shape<IxDyn>, bound: f32, rng: &mut R) -> Result<ArrayD<f32>> {
    Ok(ArrayD::random_using(
        dim,
        Uniform::new_inclusive(-bound, bound)?,
        rng,
    ))
}
