pub mod grid_world;
pub mod line_world;

use crate::error::Result;

pub use grid_world::{GridWorld, GRID_NUM_ACTIONS, GRID_NUM_STATE_FEATURES};
pub use line_world::{LineWorld, LINE_NUM_ACTIONS, LINE_NUM_STATE_FEATURES};

/// Episodic environment with a fixed-size feature vector and a discrete
/// action space, as consumed by the Q-learning loops.
pub trait DeepDiscreteActionsEnv<const NUM_STATE_FEATURES: usize, const NUM_ACTIONS: usize>: Default {
    fn state_description(&self) -> [f32; NUM_STATE_FEATURES];

    fn available_actions_ids(&self) -> impl Iterator<Item = usize>;

    /// 1.0 for legal actions, 0.0 otherwise.
    fn action_mask(&self) -> [f32; NUM_ACTIONS];

    fn step(&mut self, action: usize) -> Result<()>;

    fn is_game_over(&self) -> bool;

    fn score(&self) -> f32;

    fn reset(&mut self);
}
