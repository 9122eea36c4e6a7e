pub mod base_logger;
pub mod dueling_dqn;

pub use base_logger::{BaseLogger, RecordBase};
pub use dueling_dqn::DuelingDqnLogger;
