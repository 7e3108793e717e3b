use ndarray::{ArrayD, IxDyn, ShapeBuilder};
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::{Binomial, Distribution, LogNormal, Normal, Uniform};
use serde::{Deserialize, Serialize};

use crate::{Result, storage::MemoryOrder};

/// The sampler used by the `Distribution` init scheme.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DistributionSpec {
    Normal { mean: f32, std: f32 },
    Uniform { lower: f32, upper: f32 },
    LogNormal { mean: f32, std: f32 },
    /// A normal distribution resampled until the value lies within two standard
    /// deviations of the mean.
    TruncatedNormal { mean: f32, std: f32 },
    Binomial { trials: u64, probability: f64 },
    Constant { value: f32 },
}

impl DistributionSpec {
    /// Draws a new array of the given shape from this distribution.
    ///
    /// # Arguments
    /// * `shape` - The dimensions of the array.
    /// * `order` - The memory order the array is laid out in.
    /// * `rng` - A random number generator.
    ///
    /// # Returns
    /// The sampled array or an `InvalidDistribution` if the parameters are rejected.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        shape: &[usize],
        order: MemoryOrder,
        rng: &mut R,
    ) -> Result<ArrayD<f32>> {
        let dim = IxDyn(shape).set_f(order.is_column_major());

        let arr: ArrayD<f32> = match *self {
            DistributionSpec::Normal { mean, std } => {
                ArrayD::random_using(dim, Normal::new(mean, std)?, rng)
            }
            DistributionSpec::Uniform { lower, upper } => {
                ArrayD::random_using(dim, Uniform::new(lower, upper)?, rng)
            }
            DistributionSpec::LogNormal { mean, std } => {
                ArrayD::random_using(dim, LogNormal::new(mean, std)?, rng)
            }
            DistributionSpec::TruncatedNormal { mean, std } => {
                let truncated = TruncatedNormal {
                    normal: Normal::new(mean, std)?,
                    mean,
                    bound: 2. * std.abs(),
                };
                ArrayD::random_using(dim, truncated, rng)
            }
            DistributionSpec::Binomial {
                trials,
                probability,
            } => ArrayD::<u64>::random_using(dim, Binomial::new(trials, probability)?, rng)
                .mapv(|k| k as f32),
            DistributionSpec::Constant { value } => ArrayD::from_elem(dim, value),
        };

        Ok(arr)
    }
}

struct TruncatedNormal {
    normal: Normal<f32>,
    mean: f32,
    bound: f32,
}

impl Distribution<f32> for TruncatedNormal {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        loop {
            let x = self.normal.sample(rng);
            if (x - self.mean).abs() <= self.bound {
                return x;
            }
        }
    }
}
