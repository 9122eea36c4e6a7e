use burn::prelude::*;
use burn::record::{FullPrecisionSettings, NamedMpkFileRecorder};
use burn::tensor::ElementConversion;
use rand::prelude::IteratorRandom;
use rand::Rng;
use crate::error::{HeadError, Result};

/// Linear decay from `start` at episode 0 to `end` at `num_episodes`.
pub fn linear_epsilon(episode: usize, num_episodes: usize, start: f32, end: f32) -> f32 {
    let frac = if num_episodes == 0 { 1.0 } else { episode as f32 / num_episodes as f32 };
    (1.0 - frac) * start + frac * end
}

/// Push illegal actions down to `f32::MIN` so argmax never picks them.
pub fn mask_q_values<B: Backend, const D: usize>(q: Tensor<B, D>, mask: Tensor<B, D>) -> Tensor<B, D> {
    let inverted_mask = mask.clone().mul_scalar(-1.0).add_scalar(1.0);
    q * mask + inverted_mask.mul_scalar(f32::MIN)
}

pub fn greedy_action<B: Backend>(q_s: &Tensor<B, 1>, mask_tensor: &Tensor<B, 1>) -> usize {
    let masked_q_s = mask_q_values(q_s.clone(), mask_tensor.clone());
    masked_q_s.argmax(0).into_scalar().elem::<i64>() as usize
}

pub fn epsilon_greedy_action<B: Backend>(
    q_s: &Tensor<B, 1>,
    mask_tensor: &Tensor<B, 1>,
    mut available_actions: impl Iterator<Item = usize>,
    epsilon: f32,
    rng: &mut impl Rng,
) -> Result<usize> {
    if rng.gen_range(0f32..=1f32) < epsilon {
        available_actions.choose(rng).ok_or(HeadError::NoLegalAction)
    } else {
        if available_actions.next().is_none() {
            return Err(HeadError::NoLegalAction);
        }
        Ok(greedy_action(q_s, mask_tensor))
    }
}

/// Draw an action from a softmax policy restricted to the legal actions.
pub fn sample_softmax_action(probs: &[f32], mask: &[f32], rng: &mut impl Rng) -> Result<usize> {
    let weights: Vec<f32> = probs.iter().zip(mask).map(|(p, m)| p * m).collect();
    let total: f32 = weights.iter().sum();
    if total.is_nan() || total <= 0.0 {
        return Err(HeadError::NoLegalAction);
    }

    let mut draw = rng.gen_range(0f32..total);
    for (action, w) in weights.iter().enumerate() {
        if *w > 0.0 && draw < *w {
            return Ok(action);
        }
        draw -= w;
    }
    // rounding left us past the last bucket
    weights.iter().rposition(|w| *w > 0.0).ok_or(HeadError::NoLegalAction)
}

pub fn load_model<B: Backend, M: Module<B>>(template: M, path: &std::path::Path, device: &B::Device) -> Result<M> {
    let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
    template
        .load_file(path.to_path_buf(), &recorder, device)
        .map_err(|err| HeadError::Recorder(format!("{err:?}")))
}
