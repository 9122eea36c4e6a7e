use burn::nn;
use burn::prelude::*;
use crate::config::{hidden_sizes, DeepLearningParams};
use crate::error::Result;
use crate::heads::{DuelingQHead, DuelingQHeadConfig};

pub trait Forward {
    type B: Backend;
    fn forward<const DIM: usize>(&self, input: Tensor<Self::B, DIM>) -> Tensor<Self::B, DIM>;
}

/// tanh MLP trunk feeding a dueling Q head.
#[derive(Module, Debug)]
pub struct DuelingQmlp<B: Backend> {
    hidden_layers: Vec<nn::Linear<B>>,
    head: DuelingQHead<B>,
}

impl<B: Backend> DuelingQmlp<B> {
    pub fn new(
        device: &B::Device,
        in_features: usize,
        num_actions: usize,
        params: &DeepLearningParams,
    ) -> Result<Self> {
        let (hidden_layers, embedding_size) = trunk(device, in_features);
        let head = params.head_config(embedding_size, num_actions).init(device)?;

        Ok(Self { hidden_layers, head })
    }

    /// Build with an explicit head configuration. Its `input_features` is
    /// overwritten with the trunk width.
    pub fn with_head(
        device: &B::Device,
        in_features: usize,
        head_config: DuelingQHeadConfig,
    ) -> Result<Self> {
        let (hidden_layers, embedding_size) = trunk(device, in_features);
        let head = DuelingQHeadConfig {
            input_features: embedding_size,
            ..head_config
        }
        .init(device)?;

        Ok(Self { hidden_layers, head })
    }

    pub fn embed<const D: usize>(&self, input: Tensor<B, D>) -> Tensor<B, D> {
        let mut x = input;
        for layer in &self.hidden_layers {
            x = layer.forward(x).tanh();
        }
        x
    }

    pub fn head(&self) -> &DuelingQHead<B> {
        &self.head
    }

    /// Temperature softmax of the Q-values, one distribution per state.
    pub fn action_probabilities<const D: usize>(&self, input: Tensor<B, D>) -> Tensor<B, D> {
        self.head.softmax(self.embed(input))
    }
}

fn trunk<B: Backend>(device: &B::Device, in_features: usize) -> (Vec<nn::Linear<B>>, usize) {
    let mut layers = Vec::new();
    let mut input_size = in_features;

    for hidden_size in hidden_sizes() {
        let layer = nn::LinearConfig::new(input_size, hidden_size).with_bias(true).init(device);
        layers.push(layer);
        input_size = hidden_size;
    }

    (layers, input_size)
}

impl<B: Backend> Forward for DuelingQmlp<B> {
    type B = B;

    fn forward<const D: usize>(&self, input: Tensor<B, D>) -> Tensor<B, D> {
        self.head.forward(self.embed(input))
    }
}
