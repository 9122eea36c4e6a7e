use std::fmt::Display;
use crate::environments::DeepDiscreteActionsEnv;
use crate::error::{HeadError, Result};

pub const GRID_NUM_ACTIONS: usize = 4;
pub const NUM_COLS: usize = 5;
pub const NUM_BOARD_SIZE: usize = NUM_COLS * NUM_COLS;
pub const GRID_NUM_STATE_FEATURES: usize = NUM_BOARD_SIZE * 2;

const UP: usize = 0;
const DOWN: usize = 1;
const LEFT: usize = 2;
const RIGHT: usize = 3;

/// 5x5 grid, the agent starts in the centre. The right column scores +1,
/// the left column -1; both end the episode.
#[derive(Clone, Debug)]
pub struct GridWorld {
    pub board: [f32; NUM_BOARD_SIZE],
    pub score: f32,
    pub is_game_over: bool,
    pub current_state: usize,
}

impl Default for GridWorld {
    fn default() -> Self {
        let mut board = [0f32; NUM_BOARD_SIZE];
        board[NUM_BOARD_SIZE / 2] = 1.0;
        Self {
            board,
            score: 0.0,
            is_game_over: false,
            current_state: NUM_BOARD_SIZE / 2,
        }
    }
}

impl GridWorld {
    fn is_legal(&self, action: usize) -> bool {
        let row = self.current_state / NUM_COLS;
        let col = self.current_state % NUM_COLS;
        match action {
            UP => row > 0,
            DOWN => row < NUM_COLS - 1,
            LEFT => col > 0,
            RIGHT => col < NUM_COLS - 1,
            _ => false,
        }
    }
}

impl DeepDiscreteActionsEnv<GRID_NUM_STATE_FEATURES, GRID_NUM_ACTIONS> for GridWorld {
    fn state_description(&self) -> [f32; GRID_NUM_STATE_FEATURES] {
        // one-hot over {empty, agent} for every cell
        std::array::from_fn(|idx| {
            let cell = idx / 2;
            let feature = idx % 2;
            if self.board[cell] == feature as f32 { 1.0 } else { 0.0 }
        })
    }

    fn available_actions_ids(&self) -> impl Iterator<Item = usize> {
        let mask = self.action_mask();
        (0..GRID_NUM_ACTIONS).filter(move |&a| mask[a] > 0.0)
    }

    fn action_mask(&self) -> [f32; GRID_NUM_ACTIONS] {
        std::array::from_fn(|action| {
            if !self.is_game_over && self.is_legal(action) { 1.0 } else { 0.0 }
        })
    }

    fn step(&mut self, action: usize) -> Result<()> {
        if self.is_game_over {
            return Err(HeadError::GameOver);
        }
        if !self.is_legal(action) {
            return Err(HeadError::InvalidAction { action, num_actions: GRID_NUM_ACTIONS });
        }

        let next = match action {
            UP => self.current_state - NUM_COLS,
            DOWN => self.current_state + NUM_COLS,
            LEFT => self.current_state - 1,
            _ => self.current_state + 1,
        };
        self.board[self.current_state] = 0.0;
        self.current_state = next;
        self.board[self.current_state] = 1.0;

        let col = self.current_state % NUM_COLS;
        if col == NUM_COLS - 1 {
            self.is_game_over = true;
            self.score = 1.0;
        } else if col == 0 {
            self.is_game_over = true;
            self.score = -1.0;
        }
        Ok(())
    }

    fn is_game_over(&self) -> bool { self.is_game_over }

    fn score(&self) -> f32 { self.score }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Display for GridWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let agent_row = self.current_state / NUM_COLS;
        let agent_col = self.current_state % NUM_COLS;
        for row in 0..NUM_COLS {
            for col in 0..NUM_COLS {
                if row == agent_row && col == agent_col {
                    f.write_str("X ")?;
                } else {
                    f.write_str("_ ")?;
                }
            }
            f.write_str("\n")?;
        }
        f.write_str("\n")?;
        writeln!(f, "Score: {}", self.score)?;
        writeln!(f, "Game Over: {}", self.is_game_over)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centre_start_allows_every_move() {
        let env = GridWorld::default();
        assert_eq!(env.available_actions_ids().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn top_row_masks_up() {
        let mut env = GridWorld::default();
        env.step(UP).unwrap();
        env.step(UP).unwrap();
        assert_eq!(env.action_mask()[UP], 0.0);
        assert!(matches!(env.step(UP), Err(HeadError::InvalidAction { .. })));
    }

    #[test]
    fn right_column_wins() {
        let mut env = GridWorld::default();
        env.step(RIGHT).unwrap();
        env.step(RIGHT).unwrap();
        assert!(env.is_game_over());
        assert_eq!(env.score(), 1.0);
        assert_eq!(env.action_mask(), [0.0; GRID_NUM_ACTIONS]);
    }

    #[test]
    fn state_marks_exactly_one_agent_cell() {
        let mut env = GridWorld::default();
        env.step(DOWN).unwrap();
        let s = env.state_description();
        let agent_features = s.iter().skip(1).step_by(2).filter(|v| **v == 1.0).count();
        assert_eq!(agent_features, 1);
        assert_eq!(s[env.current_state * 2 + 1], 1.0);
    }

    #[test]
    fn reset_returns_to_centre() {
        let mut env = GridWorld::default();
        env.step(LEFT).unwrap();
        env.reset();
        assert_eq!(env.current_state, NUM_BOARD_SIZE / 2);
        assert!(!env.is_game_over());
    }
}
