//! Dueling Q head.
//!
//! Two towers share the same input embedding:
//! - State value stream V: `number_layers` x Dense(units) -> Dense(1)
//! - Action advantage stream A: `number_layers` x Dense(units) -> Dense(num_actions)
//!
//! Q(s,a) = V(s) + (A(s,a) - mean_a A(s,a))

use burn::module::Ignored;
use burn::nn;
use burn::prelude::*;
use crate::error::HeadError;
use super::{Activation, HeadSettings, QLossType, QValueHead};

#[derive(Config, Debug)]
pub struct DuelingQHeadConfig {
    /// Width of the embedding the head is attached to
    pub input_features: usize,
    /// Size of the discrete action space
    pub num_actions: usize,
    /// Hidden dense layers in each tower
    #[config(default = "1")]
    pub number_layers: usize,
    /// Width of every hidden dense layer
    #[config(default = "512")]
    pub units: usize,
    #[config(default = "Activation::Relu")]
    pub activation: Activation,
    #[config(default = "1.0")]
    pub softmax_temperature: f32,
    #[config(default = "1.0")]
    pub loss_weight: f32,
    #[config(default = "QLossType::MeanSquaredError")]
    pub loss_type: QLossType,
}

impl DuelingQHeadConfig {
    fn settings(&self) -> HeadSettings {
        HeadSettings {
            input_features: self.input_features,
            num_actions: self.num_actions,
            activation: self.activation,
            softmax_temperature: self.softmax_temperature,
            loss_weight: self.loss_weight,
            loss_type: self.loss_type,
        }
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        if self.number_layers == 0 {
            return Err(HeadError::invalid_parameter("number_layers", "must be at least 1"));
        }
        if self.units == 0 {
            return Err(HeadError::invalid_parameter("units", "must be at least 1"));
        }
        self.settings().validate()
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> crate::error::Result<DuelingQHead<B>> {
        self.validate()?;

        let value_tower = self.tower(device);
        let value_output = nn::LinearConfig::new(self.units, 1).with_bias(true).init(device);

        let advantage_tower = self.tower(device);
        let advantage_output = nn::LinearConfig::new(self.units, self.num_actions)
            .with_bias(true)
            .init(device);

        Ok(DuelingQHead {
            value_tower,
            value_output,
            advantage_tower,
            advantage_output,
            settings: Ignored(self.settings()),
        })
    }

    fn tower<B: Backend>(&self, device: &B::Device) -> Vec<nn::Linear<B>> {
        let mut layers = Vec::with_capacity(self.number_layers);
        let mut input_size = self.input_features;

        for _ in 0..self.number_layers {
            let layer = nn::LinearConfig::new(input_size, self.units).with_bias(true).init(device);
            layers.push(layer);
            input_size = self.units;
        }
        layers
    }
}

#[derive(Module, Debug)]
pub struct DuelingQHead<B: Backend> {
    value_tower: Vec<nn::Linear<B>>,
    value_output: nn::Linear<B>,
    advantage_tower: Vec<nn::Linear<B>>,
    advantage_output: nn::Linear<B>,
    settings: Ignored<HeadSettings>,
}

/// Every intermediate stream of a dueling forward pass.
#[derive(Debug, Clone)]
pub struct DuelingQOutput<B: Backend, const D: usize> {
    /// V(s), `[.., 1]`
    pub state_value: Tensor<B, D>,
    /// A(s,a) - mean_a A(s,a), `[.., num_actions]`
    pub advantage: Tensor<B, D>,
    /// V(s) + centred advantage, `[.., num_actions]`
    pub q_values: Tensor<B, D>,
}

impl<B: Backend> DuelingQHead<B> {
    pub fn forward_streams<const D: usize>(&self, input: Tensor<B, D>) -> DuelingQOutput<B, D> {
        let activation = self.settings.0.activation;

        let mut v = input.clone();
        for layer in &self.value_tower {
            v = activation.apply(layer.forward(v));
        }
        let state_value = self.value_output.forward(v);

        let mut a = input;
        for layer in &self.advantage_tower {
            a = activation.apply(layer.forward(a));
        }
        let advantage = self.advantage_output.forward(a);

        // centre over the action dimension, per state
        let advantage_mean = advantage.clone().mean_dim(D - 1);
        let advantage = advantage - advantage_mean;

        let q_values = state_value.clone() + advantage.clone();

        DuelingQOutput { state_value, advantage, q_values }
    }

    pub fn forward<const D: usize>(&self, input: Tensor<B, D>) -> Tensor<B, D> {
        self.forward_streams(input).q_values
    }

    /// Temperature-scaled softmax over the Q-values.
    pub fn softmax<const D: usize>(&self, input: Tensor<B, D>) -> Tensor<B, D> {
        self.softmax_with_temperature(input)
    }

    pub fn number_layers(&self) -> usize {
        self.value_tower.len()
    }

    pub fn units(&self) -> usize {
        self.value_output.weight.val().dims()[0]
    }

    pub fn activation(&self) -> Activation {
        self.settings.0.activation
    }

    pub fn describe(&self) -> String {
        let hidden = format!("\tDense (num outputs = {})", self.units());
        let num_actions = self.settings.0.num_actions;

        let mut lines = vec!["State Value Stream - V".to_string()];
        lines.extend(std::iter::repeat(hidden.clone()).take(self.number_layers()));
        lines.push("\tDense (num outputs = 1)".to_string());
        lines.push("Action Advantage Stream - A".to_string());
        lines.extend(std::iter::repeat(hidden).take(self.advantage_tower.len()));
        lines.push(format!("\tDense (num outputs = {})", num_actions));
        lines.push("\tSubtract(A, Mean(A))".to_string());
        lines.push("Add (V, A)".to_string());
        lines.join("\n")
    }
}

impl<B: Backend> QValueHead<B> for DuelingQHead<B> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use burn::tensor::Distribution;

    type TestBackend = NdArray;

    fn head(number_layers: usize, units: usize, num_actions: usize) -> DuelingQHead<TestBackend> {
        DuelingQHeadConfig::new(6, num_actions)
            .with_number_layers(number_layers)
            .with_units(units)
            .init(&Default::default())
            .unwrap()
    }

    fn random_batch(batch: usize) -> Tensor<TestBackend, 2> {
        Tensor::random([batch, 6], Distribution::Normal(0.0, 1.0), &Default::default())
    }

    #[test]
    fn q_values_have_action_width() {
        let q = head(2, 16, 4).forward(random_batch(5));
        assert_eq!(q.dims(), [5, 4]);
    }

    #[test]
    fn single_state_forward_keeps_rank() {
        let device = Default::default();
        let s = Tensor::<TestBackend, 1>::from_floats([0.1, 0.2, 0.3, 0.4, 0.5, 0.6], &device);
        let q = head(1, 8, 3).forward(s);
        assert_eq!(q.dims(), [3]);
    }

    #[test]
    fn advantage_rows_are_centred() {
        let out = head(2, 16, 5).forward_streams(random_batch(7));
        let rows = out.advantage.sum_dim(1).into_data().to_vec::<f32>().unwrap();
        assert_eq!(rows.len(), 7);
        for sum in rows {
            assert!(sum.abs() < 1e-4, "advantage row sum {sum}");
        }
    }

    #[test]
    fn mean_q_equals_state_value() {
        let out = head(1, 32, 3).forward_streams(random_batch(4));
        let mean_q = out.q_values.mean_dim(1).into_data().to_vec::<f32>().unwrap();
        let v = out.state_value.into_data().to_vec::<f32>().unwrap();
        for (q, v) in mean_q.iter().zip(v.iter()) {
            assert!((q - v).abs() < 1e-4);
        }
    }

    #[test]
    fn towers_are_chained() {
        let h = head(3, 10, 2);
        assert_eq!(h.number_layers(), 3);
        assert_eq!(h.value_tower[0].weight.val().dims(), [6, 10]);
        assert_eq!(h.value_tower[1].weight.val().dims(), [10, 10]);
        assert_eq!(h.advantage_tower[2].weight.val().dims(), [10, 10]);
        assert_eq!(h.advantage_output.weight.val().dims(), [10, 2]);
        assert_eq!(h.value_output.weight.val().dims(), [10, 1]);
    }

    #[test]
    fn softmax_is_a_distribution_per_state() {
        let probs = head(1, 8, 4).softmax(random_batch(3)).into_data().to_vec::<f32>().unwrap();
        for row in probs.chunks(4) {
            assert!(row.iter().all(|p| *p >= 0.0));
            assert!((row.iter().sum::<f32>() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let device = Default::default();
        assert!(DuelingQHeadConfig::new(6, 3).with_number_layers(0).init::<TestBackend>(&device).is_err());
        assert!(DuelingQHeadConfig::new(6, 3).with_units(0).init::<TestBackend>(&device).is_err());
        assert!(DuelingQHeadConfig::new(0, 3).init::<TestBackend>(&device).is_err());
        assert!(DuelingQHeadConfig::new(6, 3)
            .with_softmax_temperature(0.0)
            .init::<TestBackend>(&device)
            .is_err());
        assert!(DuelingQHeadConfig::new(6, 3)
            .with_loss_type(QLossType::Huber { delta: -1.0 })
            .validate()
            .is_err());
    }

    #[test]
    fn description_lists_every_layer() {
        let text = head(2, 64, 3).describe();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.first(), Some(&"State Value Stream - V"));
        assert_eq!(lines.last(), Some(&"Add (V, A)"));
        assert_eq!(lines.iter().filter(|l| l.contains("num outputs = 64")).count(), 4);
        assert!(lines.contains(&"\tDense (num outputs = 3)"));
        assert!(lines.contains(&"\tSubtract(A, Mean(A))"));
    }

    #[test]
    fn config_survives_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("head.json");
        DuelingQHeadConfig::new(12, 4)
            .with_number_layers(3)
            .with_activation(Activation::Tanh)
            .with_softmax_temperature(0.25)
            .save(&path)
            .unwrap();

        let loaded = DuelingQHeadConfig::load(&path).unwrap();
        assert_eq!(loaded.input_features, 12);
        assert_eq!(loaded.number_layers, 3);
        assert_eq!(loaded.units, 512);
        assert_eq!(loaded.activation, Activation::Tanh);
        assert_eq!(loaded.softmax_temperature, 0.25);
    }
}
