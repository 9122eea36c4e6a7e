//! Q-value heads attached on top of a feature trunk.
//!
//! A head maps an embedding `[.., input_features]` to Q-values
//! `[.., num_actions]`. Every head also owns its regression loss and a
//! temperature-scaled softmax over its Q-values, used in batch RL to read the
//! Q-values as a probability distribution over actions.

pub mod activation;
pub mod dueling_q_head;
pub mod loss;
pub mod q_head;

use burn::prelude::*;
use burn::tensor::activation::softmax;
use crate::error::{HeadError, Result};

pub use activation::Activation;
pub use dueling_q_head::{DuelingQHead, DuelingQHeadConfig, DuelingQOutput};
pub use loss::{q_loss, QLossType};
pub use q_head::{QHead, QHeadConfig};

/// `softmax(q / temperature)` over the last (action) dimension.
pub fn softmax_with_temperature<B: Backend, const D: usize>(
    q_values: Tensor<B, D>,
    temperature: f32,
) -> Tensor<B, D> {
    softmax(q_values.div_scalar(temperature), D - 1)
}

pub trait QValueHead<B: Backend> {
    fn num_actions(&self) -> usize;

    fn q_values<const D: usize>(&self, input: Tensor<B, D>) -> Tensor<B, D>;

    fn softmax_temperature(&self) -> f32;

    fn loss_weight(&self) -> f32;

    fn loss_type(&self) -> QLossType;

    fn softmax_with_temperature<const D: usize>(&self, input: Tensor<B, D>) -> Tensor<B, D> {
        softmax_with_temperature(self.q_values(input), self.softmax_temperature())
    }

    /// Head loss between predicted Q-values and their regression targets.
    fn loss<const D: usize>(
        &self,
        q_values: Tensor<B, D>,
        targets: Tensor<B, D>,
        importance_weights: Option<Tensor<B, 1>>,
    ) -> Tensor<B, 1> {
        q_loss(q_values, targets, self.loss_type(), self.loss_weight(), importance_weights)
    }
}

/// Non-parameter state shared by every head.
#[derive(Clone, Debug)]
pub struct HeadSettings {
    pub input_features: usize,
    pub num_actions: usize,
    pub activation: Activation,
    pub softmax_temperature: f32,
    pub loss_weight: f32,
    pub loss_type: QLossType,
}

impl HeadSettings {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.input_features == 0 {
            return Err(HeadError::invalid_parameter("input_features", "must be at least 1"));
        }
        if self.num_actions == 0 {
            return Err(HeadError::invalid_parameter("num_actions", "must be at least 1"));
        }
        if !self.softmax_temperature.is_finite() || self.softmax_temperature <= 0.0 {
            return Err(HeadError::invalid_parameter(
                "softmax_temperature",
                format!("must be finite and positive, got {}", self.softmax_temperature),
            ));
        }
        if !self.loss_weight.is_finite() || self.loss_weight < 0.0 {
            return Err(HeadError::invalid_parameter(
                "loss_weight",
                format!("must be finite and non-negative, got {}", self.loss_weight),
            ));
        }
        if let QLossType::Huber { delta } = self.loss_type {
            if !delta.is_finite() || delta <= 0.0 {
                return Err(HeadError::invalid_parameter(
                    "loss_type",
                    format!("huber delta must be finite and positive, got {delta}"),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn temperature_flattens_distribution() {
        let device = Default::default();
        let q = Tensor::<TestBackend, 2>::from_floats([[1.0, 2.0, 3.0]], &device);

        let sharp = softmax_with_temperature(q.clone(), 0.5).into_data().to_vec::<f32>().unwrap();
        let flat = softmax_with_temperature(q, 10.0).into_data().to_vec::<f32>().unwrap();

        assert!((sharp.iter().sum::<f32>() - 1.0).abs() < 1e-5);
        assert!((flat.iter().sum::<f32>() - 1.0).abs() < 1e-5);
        assert!(sharp[2] > flat[2]);
        assert!(sharp[0] < flat[0]);
    }

    #[test]
    fn unit_temperature_is_plain_softmax() {
        let device = Default::default();
        let q = Tensor::<TestBackend, 1>::from_floats([0.0, 0.0], &device);
        let probs = softmax_with_temperature(q, 1.0).into_data().to_vec::<f32>().unwrap();
        assert!((probs[0] - 0.5).abs() < 1e-6);
        assert!((probs[1] - 0.5).abs() < 1e-6);
    }
}
