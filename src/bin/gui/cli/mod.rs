pub mod common;
pub mod play;
pub mod submenu;
