use std::time::{Duration, Instant};
use burn::module::AutodiffModule;
use burn::optim::{decay::WeightDecayConfig, AdamConfig, GradientsParams, Optimizer};
use burn::prelude::*;
use burn::tensor::backend::AutodiffBackend;
use burn::tensor::{ElementConversion, TensorData};
use kdam::tqdm;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use crate::algorithms::helpers::{
    epsilon_greedy_action, greedy_action, linear_epsilon, mask_q_values, sample_softmax_action,
};
use crate::algorithms::replay_buffer::{ReplayBuffer, Transition};
use crate::config::DeepLearningParams;
use crate::environments::DeepDiscreteActionsEnv;
use crate::error::{HeadError, Result};
use crate::heads::QValueHead;
use crate::logger::DuelingDqnLogger;
use crate::model::{DuelingQmlp, Forward};

type EnvTransition<const N: usize, const A: usize> = Transition<[f32; N], [f32; A]>;

fn validate(params: &DeepLearningParams) -> Result<()> {
    if params.episode_stop == 0 {
        return Err(HeadError::invalid_parameter("episode_stop", "must be at least 1"));
    }
    if params.batch_size == 0 {
        return Err(HeadError::invalid_parameter("batch_size", "must be at least 1"));
    }
    if params.target_update_every == 0 {
        return Err(HeadError::invalid_parameter("target_update_every", "must be at least 1"));
    }
    if !(0.0..=1.0).contains(&params.gamma) {
        return Err(HeadError::invalid_parameter("gamma", format!("must lie in [0, 1], got {}", params.gamma)));
    }
    Ok(())
}

/// Double DQN with experience replay on a dueling network.
///
/// Target: `r + gamma * (1 - done) * Q_target(s', argmax_a Q_online(s', a))`,
/// the argmax restricted to the actions legal in `s'`. The regression loss is
/// the dueling head's own loss on `Q_online(s, a)`.
pub fn episodic_dueling_double_dqn<
    const NUM_STATE_FEATURES: usize,
    const NUM_ACTIONS: usize,
    B: AutodiffBackend<FloatElem = f32, IntElem = i64>,
    Env: DeepDiscreteActionsEnv<NUM_STATE_FEATURES, NUM_ACTIONS>,
>(
    mut model: DuelingQmlp<B>,
    params: &DeepLearningParams,
    device: &B::Device,
    logger: &mut DuelingDqnLogger,
) -> Result<DuelingQmlp<B>> {
    validate(params)?;

    let mut target = model.clone();
    let mut buffer = ReplayBuffer::<[f32; NUM_STATE_FEATURES], [f32; NUM_ACTIONS]>::new(params.replay_capacity)?;
    let mut optimizer = AdamConfig::new()
        .with_weight_decay(Some(WeightDecayConfig::new(params.opt_weight_decay_penalty)))
        .init::<B, DuelingQmlp<B>>();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(params.rng_seed);

    let mut total = 0.0;
    let mut total_duration = Duration::ZERO;
    let mut total_loss = 0.0;
    let mut num_updates = 0usize;
    let mut block_episodes = 0usize;

    for ep in tqdm!(0..params.num_episodes) {
        let eps = linear_epsilon(ep, params.num_episodes, params.start_epsilon, params.final_epsilon);

        let mut env = Env::default();
        let mut s = env.state_description();
        let mut steps = 0;

        let game_start = Instant::now();
        while !env.is_game_over() && steps < params.max_steps_per_episode {
            let s_t = Tensor::<B, 1>::from_floats(s.as_slice(), device);
            let mask_t = Tensor::<B, 1>::from_floats(env.action_mask().as_slice(), device);
            let q_s = model.forward(s_t).detach();
            let a = epsilon_greedy_action(&q_s, &mask_t, env.available_actions_ids(), eps, &mut rng)?;

            let prev = env.score();
            env.step(a)?;
            let r = env.score() - prev;
            let s2 = env.state_description();

            buffer.push(Transition {
                state: s,
                action: a,
                reward: r,
                next_state: s2,
                next_mask: env.action_mask(),
                done: env.is_game_over(),
            });
            s = s2;
            steps += 1;

            if buffer.len() >= params.batch_size {
                let batch = buffer.sample_batch(params.batch_size, &mut rng)?;
                let (next_model, loss) = update::<NUM_STATE_FEATURES, NUM_ACTIONS, B, _>(
                    model, &target, &mut optimizer, &batch, params, device,
                );
                model = next_model;
                total_loss += loss;
                num_updates += 1;
            }
        }

        total += env.score();
        total_duration += game_start.elapsed();
        block_episodes += 1;

        if ep % params.target_update_every == 0 {
            target = model.clone();
        }

        // a shorter tail block is logged too
        let done_episodes = ep + 1;
        if block_episodes == params.episode_stop || done_episodes == params.num_episodes {
            let mean = total / block_episodes as f32;
            let mean_duration = total_duration / block_episodes as u32;
            let mean_loss = if num_updates > 0 { total_loss / num_updates as f32 } else { 0.0 };
            logger.log(done_episodes, mean, mean_duration, mean_loss)?;

            total = 0.0;
            total_duration = Duration::ZERO;
            total_loss = 0.0;
            num_updates = 0;
            block_episodes = 0;
        }
    }

    logger.save_model(&model, params.num_episodes)?;
    Ok(model)
}

/// Double-DQN regression targets for a batch:
/// `r + gamma * (1 - done) * Q_target(s', argmax_{a legal in s'} Q_online(s', a))`.
pub fn double_dqn_targets<const N: usize, const A: usize, B: Backend>(
    online: &DuelingQmlp<B>,
    target: &DuelingQmlp<B>,
    batch: &[Transition<[f32; N], [f32; A]>],
    gamma: f32,
    device: &B::Device,
) -> Tensor<B, 1> {
    let batch_size = batch.len();
    let mut s2_buf = Vec::with_capacity(batch_size * N);
    let mut mask_buf = Vec::with_capacity(batch_size * A);
    let mut r_buf = Vec::with_capacity(batch_size);
    let mut d_buf = Vec::with_capacity(batch_size);

    for t in batch {
        s2_buf.extend_from_slice(&t.next_state);
        mask_buf.extend_from_slice(&t.next_mask);
        r_buf.push(t.reward);
        d_buf.push(if t.done { 1.0f32 } else { 0.0 });
    }

    let s2_t = Tensor::<B, 2>::from_data(TensorData::new(s2_buf, [batch_size, N]), device);
    let next_mask = Tensor::<B, 2>::from_data(TensorData::new(mask_buf, [batch_size, A]), device);

    // online picks, target evaluates
    let q_next_online = mask_q_values(online.forward(s2_t.clone()).detach(), next_mask);
    let best_a = q_next_online.argmax(1);
    let q_next = target.forward(s2_t).detach().gather(1, best_a).squeeze::<1>(1);
    let not_done = Tensor::<B, 1>::from_data(TensorData::new(d_buf, [batch_size]), device)
        .mul_scalar(-1.0)
        .add_scalar(1.0);
    let rewards = Tensor::<B, 1>::from_data(TensorData::new(r_buf, [batch_size]), device);
    (rewards + q_next * not_done.mul_scalar(gamma)).detach()
}

fn update<const N: usize, const A: usize, B, O>(
    model: DuelingQmlp<B>,
    target: &DuelingQmlp<B>,
    optimizer: &mut O,
    batch: &[EnvTransition<N, A>],
    params: &DeepLearningParams,
    device: &B::Device,
) -> (DuelingQmlp<B>, f32)
where
    B: AutodiffBackend<FloatElem = f32, IntElem = i64>,
    O: Optimizer<DuelingQmlp<B>, B>,
{
    let batch_size = batch.len();
    let mut s_buf = Vec::with_capacity(batch_size * N);
    let mut a_buf = Vec::with_capacity(batch_size);

    for t in batch {
        s_buf.extend_from_slice(&t.state);
        a_buf.push(t.action as i64);
    }

    let s_t = Tensor::<B, 2>::from_data(TensorData::new(s_buf, [batch_size, N]), device);
    let target_vec = double_dqn_targets(&model, target, batch, params.gamma, device);

    // ── current Q(s,a) ──────────────────────────────────────────────────────
    let ind = Tensor::<B, 2, Int>::from_data(TensorData::new(a_buf, [batch_size, 1]), device);
    let q_sa = model.forward(s_t).gather(1, ind).squeeze::<1>(1);

    // ── loss, backward, optimise ────────────────────────────────────────────
    let loss = model.head().loss(q_sa, target_vec, None);
    let loss_value = loss.clone().into_scalar().elem::<f32>();

    let grads = GradientsParams::from_grads(loss.backward(), &model);
    let model = optimizer.step(params.alpha.into(), model, grads);
    (model, loss_value)
}

fn rollout_mean_score<const N: usize, const A: usize, Env: DeepDiscreteActionsEnv<N, A>>(
    episodes: usize,
    max_steps: usize,
    mut choose: impl FnMut(&Env) -> Result<usize>,
) -> Result<f32> {
    if episodes == 0 {
        return Err(HeadError::invalid_parameter("episodes", "must be at least 1"));
    }

    let mut total = 0.0;
    for _ in 0..episodes {
        let mut env = Env::default();
        let mut steps = 0;
        while !env.is_game_over() && steps < max_steps {
            let a = choose(&env)?;
            env.step(a)?;
            steps += 1;
        }
        total += env.score();
    }
    Ok(total / episodes as f32)
}

/// Greedy roll-outs without gradient tracking, returns the mean final score.
pub fn evaluate_greedy<
    const NUM_STATE_FEATURES: usize,
    const NUM_ACTIONS: usize,
    B: Backend,
    Env: DeepDiscreteActionsEnv<NUM_STATE_FEATURES, NUM_ACTIONS>,
>(
    model: &DuelingQmlp<B>,
    episodes: usize,
    max_steps: usize,
    device: &B::Device,
) -> Result<f32> {
    rollout_mean_score::<NUM_STATE_FEATURES, NUM_ACTIONS, Env>(episodes, max_steps, |env| {
        let s_t = Tensor::<B, 1>::from_floats(env.state_description().as_slice(), device);
        let mask_t = Tensor::<B, 1>::from_floats(env.action_mask().as_slice(), device);
        Ok(greedy_action(&model.forward(s_t), &mask_t))
    })
}

/// Roll-outs that sample each action from the head's temperature softmax
/// over the legal actions, returns the mean final score.
pub fn evaluate_softmax_policy<
    const NUM_STATE_FEATURES: usize,
    const NUM_ACTIONS: usize,
    B: Backend,
    Env: DeepDiscreteActionsEnv<NUM_STATE_FEATURES, NUM_ACTIONS>,
>(
    model: &DuelingQmlp<B>,
    episodes: usize,
    max_steps: usize,
    seed: u64,
    device: &B::Device,
) -> Result<f32> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    rollout_mean_score::<NUM_STATE_FEATURES, NUM_ACTIONS, Env>(episodes, max_steps, |env| {
        let s_t = Tensor::<B, 1>::from_floats(env.state_description().as_slice(), device);
        let probs = model
            .action_probabilities(s_t)
            .into_data()
            .to_vec::<f32>()
            .map_err(|err| HeadError::TensorRead(format!("{err:?}")))?;
        sample_softmax_action(&probs, &env.action_mask(), &mut rng)
    })
}

/// Train on the autodiff backend, then hand back the inference model.
pub fn train_and_evaluate<
    const NUM_STATE_FEATURES: usize,
    const NUM_ACTIONS: usize,
    B: AutodiffBackend<FloatElem = f32, IntElem = i64>,
    Env: DeepDiscreteActionsEnv<NUM_STATE_FEATURES, NUM_ACTIONS>,
>(
    params: &DeepLearningParams,
    device: &B::Device,
    logger: &mut DuelingDqnLogger,
    eval_episodes: usize,
) -> Result<(DuelingQmlp<B::InnerBackend>, f32)> {
    let model = DuelingQmlp::<B>::new(device, NUM_STATE_FEATURES, NUM_ACTIONS, params)?;
    println!("{}", model.head().describe());

    let trained = episodic_dueling_double_dqn::<NUM_STATE_FEATURES, NUM_ACTIONS, B, Env>(model, params, device, logger)?;
    let valid = trained.valid();
    let score = evaluate_greedy::<NUM_STATE_FEATURES, NUM_ACTIONS, B::InnerBackend, Env>(
        &valid,
        eval_episodes,
        params.max_steps_per_episode,
        device,
    )?;
    println!("Greedy evaluation over {} episodes: {:.3}", eval_episodes, score);
    let sampled = evaluate_softmax_policy::<NUM_STATE_FEATURES, NUM_ACTIONS, B::InnerBackend, Env>(
        &valid,
        eval_episodes,
        params.max_steps_per_episode,
        params.rng_seed,
        device,
    )?;
    println!(
        "Softmax policy (T = {}) over {} episodes: {:.3}",
        params.softmax_temperature, eval_episodes, sampled
    );
    Ok((valid, score))
}
