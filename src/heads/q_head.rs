use burn::module::Ignored;
use burn::nn;
use burn::prelude::*;
use super::{Activation, HeadSettings, QLossType, QValueHead};

/// Plain Q head: one linear layer from the embedding to the action values.
#[derive(Config, Debug)]
pub struct QHeadConfig {
    pub input_features: usize,
    pub num_actions: usize,
    #[config(default = "1.0")]
    pub softmax_temperature: f32,
    #[config(default = "1.0")]
    pub loss_weight: f32,
    #[config(default = "QLossType::MeanSquaredError")]
    pub loss_type: QLossType,
}

impl QHeadConfig {
    fn settings(&self) -> HeadSettings {
        HeadSettings {
            input_features: self.input_features,
            num_actions: self.num_actions,
            activation: Activation::None,
            softmax_temperature: self.softmax_temperature,
            loss_weight: self.loss_weight,
            loss_type: self.loss_type,
        }
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        self.settings().validate()
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> crate::error::Result<QHead<B>> {
        let settings = self.settings();
        settings.validate()?;

        let output = nn::LinearConfig::new(self.input_features, self.num_actions)
            .with_bias(true)
            .init(device);

        Ok(QHead { output, settings: Ignored(settings) })
    }
}

#[derive(Module, Debug)]
pub struct QHead<B: Backend> {
    output: nn::Linear<B>,
    settings: Ignored<HeadSettings>,
}

impl<B: Backend> QHead<B> {
    pub fn forward<const D: usize>(&self, input: Tensor<B, D>) -> Tensor<B, D> {
        self.output.forward(input)
    }

    pub fn describe(&self) -> String {
        format!("Dense (num outputs = {})", self.settings.0.num_actions)
    }
}

impl<B: Backend> QValueHead<B> for QHead<B> {
    fn num_actions(&self) -> usize {
        self.settings.0.num_actions
    }

    fn q_values<const D: usize>(&self, input: Tensor<B, D>) -> Tensor<B, D> {
        self.forward(input)
    }

    fn softmax_temperature(&self) -> f32 {
        self.settings.0.softmax_temperature
    }

    fn loss_weight(&self) -> f32 {
        self.settings.0.loss_weight
    }

    fn loss_type(&self) -> QLossType {
        self.settings.0.loss_type
    }
}
