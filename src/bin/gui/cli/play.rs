use std::fmt::Display;
use std::io;
use std::thread::sleep;
use std::time::Duration;
use burn::prelude::*;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use dueling_q_head::algorithms::helpers::{greedy_action, sample_softmax_action};
use dueling_q_head::config::{MyBackend, MyDevice};
use dueling_q_head::environments::DeepDiscreteActionsEnv;
use dueling_q_head::{DuelingQmlp, Forward, Result};
use crate::gui::cli::common::{read_line, reset_screen};

fn format_row(values: &[f32]) -> String {
    values.iter().map(|v| format!("{v:>7.3}")).collect::<Vec<_>>().join(" ")
}

/// Replay games, showing Q-values and the head's softmax each step. Actions
/// are greedy, or drawn from that softmax when `sample_softmax` is set.
pub fn watch_games<
    const NUM_STATE_FEATURES: usize,
    const NUM_ACTIONS: usize,
    Env: DeepDiscreteActionsEnv<NUM_STATE_FEATURES, NUM_ACTIONS> + Display,
>(
    model: &DuelingQmlp<MyBackend>,
    device: &MyDevice,
    max_steps: usize,
    sample_softmax: bool,
) -> Result<()> {
    let mut env = Env::default();
    let mut rng = Xoshiro256PlusPlus::from_entropy();

    loop {
        env.reset();
        let mut steps = 0;
        while !env.is_game_over() && steps < max_steps {
            println!("{}", env);

            let s_tensor = Tensor::<MyBackend, 1>::from_floats(env.state_description().as_slice(), device);
            let mask_tensor = Tensor::<MyBackend, 1>::from_floats(env.action_mask().as_slice(), device);

            let q_s = model.forward(s_tensor.clone());
            let probs = model.action_probabilities(s_tensor);
            let q_row = q_s.clone().into_data().to_vec::<f32>().unwrap_or_default();
            let p_row = probs.into_data().to_vec::<f32>().unwrap_or_default();
            println!("Q      : {}", format_row(&q_row));
            println!("softmax: {}", format_row(&p_row));

            let a = if sample_softmax {
                sample_softmax_action(&p_row, &env.action_mask(), &mut rng)?
            } else {
                greedy_action(&q_s, &mask_tensor)
            };
            env.step(a)?;
            steps += 1;
            sleep(Duration::from_millis(300));
        }

        println!("{}", env);
        println!("Press Enter to continue or 'quit' to quit");
        if read_line().eq_ignore_ascii_case("quit") {
            break;
        }
    }
    Ok(())
}

pub fn run_env_manually_solo<
    const NUM_STATE_FEATURES: usize,
    const NUM_ACTIONS: usize,
    Env: DeepDiscreteActionsEnv<NUM_STATE_FEATURES, NUM_ACTIONS> + Display,
>(env_name: &str) {
    let mut env = Env::default();
    let mut stdout = io::stdout();

    while !env.is_game_over() {
        reset_screen(&mut stdout, env_name);
        println!("{}", env);

        let available_actions: Vec<usize> = env.available_actions_ids().collect();
        println!("Available actions: {:?}", available_actions);
        println!("Enter your action (or type 'quit' to exit): ");

        let input = read_line();
        if input.eq_ignore_ascii_case("quit") {
            println!("Exiting...");
            return;
        }

        match input.parse::<usize>() {
            Ok(action) => {
                if let Err(err) = env.step(action) {
                    println!("{}", err);
                    sleep(Duration::from_secs(1));
                }
            }
            Err(_) => {
                println!("Please enter a valid number or 'quit' to exit.");
                sleep(Duration::from_secs(1));
            }
        }
    }

    reset_screen(&mut stdout, "");
    println!("Game Over!");
    println!("{}", env);
}
