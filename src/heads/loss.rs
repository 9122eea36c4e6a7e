use burn::prelude::*;
use serde::{Deserialize, Serialize};

/// Regression loss between predicted and target Q-values.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub enum QLossType {
    #[default]
    MeanSquaredError,
    Huber { delta: f32 },
}

/// Weighted, mean-reduced Q regression loss.
///
/// `importance_weights` has one entry per sample (first dimension) and is
/// broadcast over the remaining dimensions, as needed for prioritised replay.
/// The result is a single-element tensor scaled by `loss_weight`.
pub fn q_loss<B: Backend, const D: usize>(
    prediction: Tensor<B, D>,
    target: Tensor<B, D>,
    loss_type: QLossType,
    loss_weight: f32,
    importance_weights: Option<Tensor<B, 1>>,
) -> Tensor<B, 1> {
    let diff = prediction - target;

    let elementwise = match loss_type {
        QLossType::MeanSquaredError => diff.powf_scalar(2.0),
        QLossType::Huber { delta } => {
            let abs = diff.abs();
            let quadratic = abs.clone().clamp_max(delta);
            let linear = abs - quadratic.clone();
            quadratic.powf_scalar(2.0).mul_scalar(0.5) + linear.mul_scalar(delta)
        }
    };

    let weighted = match importance_weights {
        Some(weights) => {
            let mut dims = [1usize; D];
            dims[0] = elementwise.dims()[0];
            elementwise * weights.reshape(Shape::new(dims))
        }
        None => elementwise,
    };

    weighted.mean().mul_scalar(loss_weight)
}
