use std::fmt::Display;
use crate::environments::DeepDiscreteActionsEnv;
use crate::error::{HeadError, Result};

pub const LINE_NUM_CELLS: usize = 5;
pub const LINE_NUM_ACTIONS: usize = 2;
pub const LINE_NUM_STATE_FEATURES: usize = LINE_NUM_CELLS;

/// Five cells, the agent starts in the middle. Reaching the left end scores
/// -1, the right end +1. Action 0 moves left, action 1 moves right.
#[derive(Clone, Debug)]
pub struct LineWorld {
    pub current_state: usize,
    pub score: f32,
    pub is_game_over: bool,
}

impl Default for LineWorld {
    fn default() -> Self {
        Self {
            current_state: LINE_NUM_CELLS / 2,
            score: 0.0,
            is_game_over: false,
        }
    }
}

impl DeepDiscreteActionsEnv<LINE_NUM_STATE_FEATURES, LINE_NUM_ACTIONS> for LineWorld {
    fn state_description(&self) -> [f32; LINE_NUM_STATE_FEATURES] {
        std::array::from_fn(|idx| if idx == self.current_state { 1.0 } else { 0.0 })
    }

    fn available_actions_ids(&self) -> impl Iterator<Item = usize> {
        let end = if self.is_game_over { 0 } else { LINE_NUM_ACTIONS };
        0..end
    }

    fn action_mask(&self) -> [f32; LINE_NUM_ACTIONS] {
        if self.is_game_over {
            [0.0; LINE_NUM_ACTIONS]
        } else {
            [1.0; LINE_NUM_ACTIONS]
        }
    }

    fn step(&mut self, action: usize) -> Result<()> {
        if self.is_game_over {
            return Err(HeadError::GameOver);
        }

        match action {
            0 => self.current_state -= 1,
            1 => self.current_state += 1,
            _ => {
                return Err(HeadError::InvalidAction { action, num_actions: LINE_NUM_ACTIONS });
            }
        }

        if self.current_state == 0 {
            self.is_game_over = true;
            self.score = -1.0;
        } else if self.current_state == LINE_NUM_CELLS - 1 {
            self.is_game_over = true;
            self.score = 1.0;
        }
        Ok(())
    }

    fn is_game_over(&self) -> bool { self.is_game_over }

    fn score(&self) -> f32 { self.score }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Display for LineWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for cell in 0..LINE_NUM_CELLS {
            f.write_str(if cell == self.current_state { "X" } else { "_" })?;
        }
        f.write_str("\n")?;
        writeln!(f, "Score: {}", self.score)?;
        writeln!(f, "Game Over: {}", self.is_game_over)?;
        Ok(())
    }
}
