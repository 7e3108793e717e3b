use log::debug;
use rand::Rng;

use super::{BIAS_KEY, ParamInitializer, ParamTable, WEIGHT_KEY};
use crate::{
    InitErr, Result,
    initialization::WeightInit,
    specs::LayerConf,
    storage::{DEFAULT_WEIGHT_INIT_ORDER, ParamView},
};

/// Parameter initializer for element-wise layers.
///
/// These layers hold one weight and one bias per input unit, so the layer's slice is laid
/// out as `[weight; n_in][bias; n_in]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ElementWiseInitializer;

impl ParamInitializer for ElementWiseInitializer {
    fn num_params(&self, conf: &LayerConf) -> Result<usize> {
        let spec = conf.feed_forward()?;
        spec.n_in
            .checked_mul(2)
            .ok_or(InitErr::Overflow { what: "params view" })
    }

    fn init<R: Rng + ?Sized>(
        &self,
        conf: &LayerConf,
        params: &ParamView,
        initialize: bool,
        rng: &mut R,
    ) -> Result<ParamTable> {
        let spec = conf.feed_forward()?;
        self.check_params(conf, params)?;

        let n_in = spec.n_in;
        let weight = params.sub_view(0, n_in)?;
        let bias = params.sub_view(n_in, params.len())?;

        debug!(
            n_in = n_in,
            n_out = spec.n_out,
            scheme = spec.weight_init.as_str(),
            initialize = initialize;
            "laying out element-wise parameters"
        );

        let (weight, bias) = if initialize {
            let weight_init = WeightInit::new(
                n_in as f32,
                spec.n_out as f32,
                spec.weight_init,
                DEFAULT_WEIGHT_INIT_ORDER,
            )
            .with_dist(spec.dist.as_ref());

            // A failing weight init leaves the bias untouched.
            let weight = weight_init.init(&[n_in], weight, rng)?;
            bias.fill(spec.bias_init);
            (weight, bias)
        } else {
            (weight, bias)
        };

        let table = ParamTable::new();
        table.insert(WEIGHT_KEY, weight);
        table.insert(BIAS_KEY, bias);
        conf.add_variable(WEIGHT_KEY);
        conf.add_variable(BIAS_KEY);

        Ok(table)
    }

    fn gradients_from_flattened(&self, conf: &LayerConf, grad: &ParamView) -> Result<ParamTable> {
        let spec = conf.feed_forward()?;
        let n_in = spec.n_in;

        // The bias gradient is `n_out` wide, matching the gradient buffer's own layout.
        let expected = n_in
            .checked_add(spec.n_out)
            .ok_or(InitErr::Overflow {
                what: "gradient view",
            })?;

        if grad.len() < expected {
            return Err(InitErr::SizeMismatch {
                what: "gradient view",
                got: grad.len(),
                expected,
            });
        }

        let table = ParamTable::new();
        table.insert(WEIGHT_KEY, grad.sub_view(0, n_in)?);
        table.insert(BIAS_KEY, grad.sub_view(n_in, expected)?);

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{
        initialization::InitScheme,
        specs::{FeedForwardSpec, LayerSpec},
        storage::{FlatBuffer, MemoryOrder},
    };

    fn seeded_rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn conf(n_in: usize, n_out: usize, scheme: InitScheme) -> LayerConf {
        LayerConf::new(LayerSpec::FeedForward(FeedForwardSpec::new(
            n_in, n_out, scheme,
        )))
    }

    fn iota(len: usize) -> FlatBuffer {
        FlatBuffer::from_vec((0..len).map(|i| i as f32).collect(), MemoryOrder::ColumnMajor)
    }

    #[test]
    fn num_params() {
        for n_in in [0, 1, 7, 128] {
            let conf = conf(n_in, 3, InitScheme::Xavier);
            assert_eq!(ElementWiseInitializer.num_params(&conf).unwrap(), 2 * n_in);
        }
    }

    #[test]
    fn split_points() {
        let conf = conf(3, 5, InitScheme::Zero);
        let buffer = iota(6);

        let table = ElementWiseInitializer
            .init(&conf, &buffer.view(), false, &mut seeded_rng())
            .unwrap();

        assert_eq!(table.keys(), [WEIGHT_KEY, BIAS_KEY]);

        let weight = table.get(WEIGHT_KEY).unwrap();
        let bias = table.get(BIAS_KEY).unwrap();
        assert_eq!(weight.range(), 0..3);
        assert_eq!(bias.range(), 3..6);
        assert!(!weight.overlaps(&bias));
    }

    #[test]
    fn initialize_fills_weights_and_bias() {
        let spec = FeedForwardSpec::new(4, 4, InitScheme::Zero).with_bias_init(0.1);
        let conf = LayerConf::new(LayerSpec::FeedForward(spec));
        let buffer = iota(8);

        ElementWiseInitializer
            .init(&conf, &buffer.view(), true, &mut seeded_rng())
            .unwrap();

        assert_eq!(buffer.to_vec(), [0., 0., 0., 0., 0.1, 0.1, 0.1, 0.1]);
        assert_eq!(conf.variables(), [WEIGHT_KEY, BIAS_KEY]);
    }

    #[test]
    fn size_mismatch_before_slicing() {
        let conf = conf(3, 3, InitScheme::Zero);
        let buffer = iota(5);

        let err = ElementWiseInitializer
            .init(&conf, &buffer.view(), true, &mut seeded_rng())
            .unwrap_err();

        assert_eq!(
            err,
            InitErr::SizeMismatch {
                what: "params view",
                got: 5,
                expected: 6
            }
        );
        assert_eq!(buffer.to_vec(), [0., 1., 2., 3., 4.]);
        assert!(conf.variables().is_empty());
    }

    #[test]
    fn unsupported_layer_type() {
        let conf = LayerConf::new(LayerSpec::Subsampling {
            kernel: [2, 2],
            stride: [2, 2],
        });
        let buffer = iota(4);

        let err = ElementWiseInitializer
            .init(&conf, &buffer.view(), true, &mut seeded_rng())
            .unwrap_err();

        assert_eq!(err, InitErr::UnsupportedLayerType { kind: "subsampling" });
        assert!(ElementWiseInitializer.num_params(&conf).is_err());
        assert!(
            ElementWiseInitializer
                .gradients_from_flattened(&conf, &buffer.view())
                .is_err()
        );
        assert_eq!(buffer.to_vec(), [0., 1., 2., 3.]);
    }

    #[test]
    fn legacy_scheme_fails_without_touching_the_buffer() {
        let spec = FeedForwardSpec::new(2, 2, InitScheme::XavierLegacy).with_bias_init(1.);
        let conf = LayerConf::new(LayerSpec::FeedForward(spec));
        let buffer = iota(4);

        let err = ElementWiseInitializer
            .init(&conf, &buffer.view(), true, &mut seeded_rng())
            .unwrap_err();

        assert!(matches!(err, InitErr::InvalidInitScheme { .. }));
        assert_eq!(buffer.to_vec(), [0., 1., 2., 3.]);
    }

    #[test]
    fn gradient_split_uses_n_out_for_bias() {
        let conf = conf(3, 2, InitScheme::Zero);
        let buffer = iota(6);

        let table = ElementWiseInitializer
            .gradients_from_flattened(&conf, &buffer.view())
            .unwrap();

        assert_eq!(table.keys(), [WEIGHT_KEY, BIAS_KEY]);
        assert_eq!(table.get(WEIGHT_KEY).unwrap().to_vec(), [0., 1., 2.]);
        assert_eq!(table.get(BIAS_KEY).unwrap().to_vec(), [3., 4.]);
        assert!(conf.variables().is_empty());
    }

    #[test]
    fn oversized_layers_fail_instead_of_overflowing() {
        let buffer = iota(4);
        let params_overflow = InitErr::Overflow { what: "params view" };

        let wide = conf(usize::MAX / 2 + 1, 1, InitScheme::Zero);
        assert_eq!(
            ElementWiseInitializer.num_params(&wide).unwrap_err(),
            params_overflow
        );
        assert_eq!(
            ElementWiseInitializer
                .init(&wide, &buffer.view(), true, &mut seeded_rng())
                .unwrap_err(),
            params_overflow
        );

        let huge = conf(usize::MAX, 1, InitScheme::Zero);
        assert_eq!(
            ElementWiseInitializer
                .gradients_from_flattened(&huge, &buffer.view())
                .unwrap_err(),
            InitErr::Overflow {
                what: "gradient view"
            }
        );

        assert_eq!(buffer.to_vec(), [0., 1., 2., 3.]);
        assert!(wide.variables().is_empty());
    }

    #[test]
    fn gradient_view_too_short() {
        let conf = conf(3, 4, InitScheme::Zero);
        let buffer = iota(6);

        let err = ElementWiseInitializer
            .gradients_from_flattened(&conf, &buffer.view())
            .unwrap_err();

        assert_eq!(
            err,
            InitErr::SizeMismatch {
                what: "gradient view",
                got: 6,
                expected: 7
            }
        );
    }
}
