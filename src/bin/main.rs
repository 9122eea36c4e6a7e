mod gui;

use dueling_q_head::environments::{
    GridWorld, LineWorld, GRID_NUM_ACTIONS, GRID_NUM_STATE_FEATURES, LINE_NUM_ACTIONS, LINE_NUM_STATE_FEATURES,
};
use crate::gui::cli::common::user_choice;
use crate::gui::cli::submenu::submenu;

fn main() {
    loop {
        let options = vec![
            "Line World",
            "Grid World",
            "Quit",
        ];

        let selected_index = user_choice(options.clone(), "Dueling Q head");

        match selected_index {
            0 => { submenu::<LINE_NUM_STATE_FEATURES, LINE_NUM_ACTIONS, LineWorld>(options[selected_index]); },
            1 => { submenu::<GRID_NUM_STATE_FEATURES, GRID_NUM_ACTIONS, GridWorld>(options[selected_index]); },
            _ => { break; }
        }
    }
}
