use std::fmt::{Display, Formatter};
use std::str::FromStr;
use burn::prelude::*;
use burn::tensor::activation::{gelu, leaky_relu, relu, sigmoid};
use serde::{Deserialize, Serialize};
use crate::error::HeadError;

const LEAKY_RELU_SLOPE: f64 = 0.2;

/// Activation applied after every hidden dense layer of a head tower.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    #[default]
    Relu,
    Tanh,
    Sigmoid,
    LeakyRelu,
    Gelu,
    None,
}

impl Activation {
    pub fn apply<B: Backend, const D: usize>(&self, x: Tensor<B, D>) -> Tensor<B, D> {
        match self {
            Activation::Relu => relu(x),
            Activation::Tanh => x.tanh(),
            Activation::Sigmoid => sigmoid(x),
            Activation::LeakyRelu => leaky_relu(x, LEAKY_RELU_SLOPE),
            Activation::Gelu => gelu(x),
            Activation::None => x,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Activation::Relu => "relu",
            Activation::Tanh => "tanh",
            Activation::Sigmoid => "sigmoid",
            Activation::LeakyRelu => "leaky_relu",
            Activation::Gelu => "gelu",
            Activation::None => "none",
        }
    }
}

impl Display for Activation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Activation {
    type Err = HeadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relu" => Ok(Activation::Relu),
            "tanh" => Ok(Activation::Tanh),
            "sigmoid" => Ok(Activation::Sigmoid),
            "leaky_relu" | "leakyrelu" => Ok(Activation::LeakyRelu),
            "gelu" => Ok(Activation::Gelu),
            "none" | "linear" => Ok(Activation::None),
            other => Err(HeadError::invalid_parameter(
                "activation",
                format!("unknown activation function '{other}'"),
            )),
        }
    }
}
