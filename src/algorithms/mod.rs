pub mod dueling_double_dqn;
pub mod helpers;
pub mod replay_buffer;

pub use dueling_double_dqn::{
    double_dqn_targets, episodic_dueling_double_dqn, evaluate_greedy, evaluate_softmax_policy, train_and_evaluate,
};
pub use replay_buffer::{ReplayBuffer, Transition};
