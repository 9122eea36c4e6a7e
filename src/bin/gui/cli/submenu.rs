use std::fmt::Display;
use dueling_q_head::algorithms::train_and_evaluate;
use dueling_q_head::config::{get_device, DeepLearningParams, MyAutodiffBackend, MyDevice};
use dueling_q_head::environments::DeepDiscreteActionsEnv;
use dueling_q_head::logger::DuelingDqnLogger;
use dueling_q_head::{DuelingQmlp, Result};
use crate::gui::cli::common::{end_of_run, user_choice};
use crate::gui::cli::play::{run_env_manually_solo, watch_games};

pub fn submenu<
    const NUM_STATE_FEATURES: usize,
    const NUM_ACTIONS: usize,
    Env: DeepDiscreteActionsEnv<NUM_STATE_FEATURES, NUM_ACTIONS> + Display,
>(env_name: &str) {
    loop {
        let options = vec![
            "Play manually",
            "Train dueling Double DQN",
            "Show network architecture",
            "Back",
        ];

        let message = format!("Menu for {}", env_name);
        let selected_index = user_choice(options.clone(), &message);

        let outcome = match selected_index {
            0 => {
                run_env_manually_solo::<NUM_STATE_FEATURES, NUM_ACTIONS, Env>(env_name);
                Ok(())
            }
            1 => run_dueling_ddqn::<NUM_STATE_FEATURES, NUM_ACTIONS, Env>(env_name),
            2 => show_architecture::<NUM_STATE_FEATURES, NUM_ACTIONS>(),
            _ => break,
        };

        if let Err(err) = outcome {
            eprintln!("{} failed: {}", options[selected_index], err);
        }
        end_of_run();
    }
}

fn show_architecture<const NUM_STATE_FEATURES: usize, const NUM_ACTIONS: usize>() -> Result<()> {
    let device: MyDevice = get_device();
    let params = DeepLearningParams::default();
    let model = DuelingQmlp::<MyAutodiffBackend>::new(&device, NUM_STATE_FEATURES, NUM_ACTIONS, &params)?;

    println!("Trunk: {} -> {:?} (tanh)", NUM_STATE_FEATURES, dueling_q_head::config::hidden_sizes());
    println!("{}", model.head().describe());
    Ok(())
}

fn run_dueling_ddqn<
    const NUM_STATE_FEATURES: usize,
    const NUM_ACTIONS: usize,
    Env: DeepDiscreteActionsEnv<NUM_STATE_FEATURES, NUM_ACTIONS> + Display,
>(env_name: &str) -> Result<()> {
    let device: MyDevice = get_device();
    println!("Using device: {:?}", device);

    let params = DeepLearningParams::default();
    let mut logger = DuelingDqnLogger::new(format!("./data/{}/dueling_ddqn", env_name), env_name, &params)?;

    let (trained, _score) = train_and_evaluate::<NUM_STATE_FEATURES, NUM_ACTIONS, MyAutodiffBackend, Env>(
        &params,
        &device,
        &mut logger,
        100,
    )?;
    println!("Run saved in {:?}", logger.run_dir());

    let replay = vec!["Watch greedy games", "Watch softmax-sampled games", "Back"];
    match user_choice(replay, "Replay the trained model") {
        0 => watch_games::<NUM_STATE_FEATURES, NUM_ACTIONS, Env>(&trained, &device, params.max_steps_per_episode, false),
        1 => watch_games::<NUM_STATE_FEATURES, NUM_ACTIONS, Env>(&trained, &device, params.max_steps_per_episode, true),
        _ => Ok(()),
    }
}

