use burn::backend::{Autodiff, LibTorch, NdArray};
use burn::prelude::Backend;
use crate::heads::{Activation, DuelingQHeadConfig, QLossType};

/**
* -------------------------------------------------------------------------
* BACKEND AND DEVICE INITIALIZATION
* -------------------------------------------------------------------------
*/
pub type MyBackend = LibTorch;
pub type MyAutodiffBackend = Autodiff<MyBackend>;
pub type MyDevice = <MyBackend as Backend>::Device;

/// CPU-only backend, no libtorch runtime needed at inference time.
pub type CpuBackend = NdArray;

pub fn get_device() -> MyDevice {
    let use_gpu = std::env::args().any(|arg| arg == "--gpu");

    if use_gpu && tch::Cuda::is_available() {
        burn::backend::libtorch::LibTorchDevice::Cuda(0)
    } else {
        burn::backend::libtorch::LibTorchDevice::Cpu
    }
}

/**
* -------------------------------------------------------------------------
* NEURAL NETWORK HIDDEN LAYERS (feature trunk under the head)
* -------------------------------------------------------------------------
*/
pub fn hidden_sizes() -> Vec<usize> {
    vec![128, 64]
}

/**
* -------------------------------------------------------------------------
* DUELING DOUBLE DQN
* -------------------------------------------------------------------------
*/
#[derive(Clone, Debug)]
pub struct DeepLearningParams {
    pub num_episodes: usize,
    pub episode_stop: usize,
    pub start_epsilon: f32,
    pub final_epsilon: f32,

    pub gamma: f32,
    pub alpha: f32, // base LR
    pub opt_weight_decay_penalty: f32,

    // experience replay
    pub replay_capacity: usize,
    pub batch_size: usize,
    pub target_update_every: usize,

    // dueling head
    pub head_number_layers: usize,
    pub head_units: usize,
    pub head_activation: Activation,
    pub softmax_temperature: f32,
    pub huber_delta: Option<f32>,

    // safety net for environments that never terminate under a bad policy
    pub max_steps_per_episode: usize,

    pub rng_seed: u64,
}

impl Default for DeepLearningParams {
    fn default() -> Self {
        Self {
            num_episodes: 1_000,
            episode_stop: 100,
            start_epsilon: 1.0,
            final_epsilon: 1e-5,

            gamma: 0.999,
            alpha: 3e-3,
            opt_weight_decay_penalty: 1e-4,

            replay_capacity: 10_000,
            batch_size: 32,
            target_update_every: 10,

            head_number_layers: 1,
            head_units: 64,
            head_activation: Activation::Relu,
            softmax_temperature: 1.0,
            huber_delta: None,

            max_steps_per_episode: 200,

            rng_seed: 172_848_556_3,
        }
    }
}

impl DeepLearningParams {
    /// Dueling head settings for a trunk of width `input_features`.
    pub fn head_config(&self, input_features: usize, num_actions: usize) -> DuelingQHeadConfig {
        let loss_type = match self.huber_delta {
            Some(delta) => QLossType::Huber { delta },
            None => QLossType::MeanSquaredError,
        };

        DuelingQHeadConfig::new(input_features, num_actions)
            .with_number_layers(self.head_number_layers)
            .with_units(self.head_units)
            .with_activation(self.head_activation)
            .with_softmax_temperature(self.softmax_temperature)
            .with_loss_type(loss_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn head_config_follows_params() {
        let params = DeepLearningParams {
            head_number_layers: 2,
            head_units: 32,
            huber_delta: Some(1.0),
            ..Default::default()
        };
        let config = params.head_config(64, 4);
        assert_eq!(config.input_features, 64);
        assert_eq!(config.num_actions, 4);
        assert_eq!(config.number_layers, 2);
        assert_eq!(config.units, 32);
        assert_eq!(config.loss_type, QLossType::Huber { delta: 1.0 });
        assert!(config.validate().is_ok());
    }
}
