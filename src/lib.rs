//! Dueling Q-value head for deep Q-learning agents, built on burn.
//!
//! The head splits Q-value estimation into a state-value tower V(s) and an
//! action-advantage tower A(s,a), recombined as
//! `Q(s,a) = V(s) + (A(s,a) - mean_a A(s,a))`. Everything around it (trunk,
//! replay, Double DQN loop, environments, run logging) exists to train and
//! exercise that head.

pub mod algorithms;
pub mod config;
pub mod environments;
pub mod error;
pub mod heads;
pub mod logger;
pub mod model;

pub use error::{HeadError, Result};
pub use heads::{DuelingQHead, DuelingQHeadConfig, QValueHead};
pub use model::{DuelingQmlp, Forward};
