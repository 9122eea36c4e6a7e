use std::fmt;

/// Result type for head, environment and training operations
pub type Result<T> = std::result::Result<T, HeadError>;

#[derive(Debug)]
pub enum HeadError {
    /// A hyper-parameter is out of its valid range
    InvalidParameter {
        name: String,
        reason: String,
    },

    /// The action is not legal in the current state
    InvalidAction {
        action: usize,
        num_actions: usize,
    },

    /// Stepping an environment whose episode already ended
    GameOver,

    /// No action is legal, or the policy puts no mass on any legal action
    NoLegalAction,

    /// Not enough transitions stored to draw a batch
    EmptyBuffer {
        requested: usize,
        available: usize,
    },

    Io(std::io::Error),

    Csv(csv::Error),

    /// Saving or loading a module record failed
    Recorder(String),

    /// A tensor could not be read back as host values
    TensorRead(String),
}

impl HeadError {
    pub fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        HeadError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for HeadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeadError::InvalidParameter { name, reason } => {
                write!(f, "Invalid parameter '{}': {}", name, reason)
            }
            HeadError::InvalidAction { action, num_actions } => {
                write!(f, "Invalid action {} (action space has {} actions)", action, num_actions)
            }
            HeadError::GameOver => write!(f, "Trying to play while the game is over"),
            HeadError::NoLegalAction => write!(f, "No legal action to choose from"),
            HeadError::EmptyBuffer { requested, available } => {
                write!(f, "Cannot sample {} transitions, only {} stored", requested, available)
            }
            HeadError::Io(err) => write!(f, "IO error: {}", err),
            HeadError::Csv(err) => write!(f, "CSV error: {}", err),
            HeadError::Recorder(msg) => write!(f, "Recorder error: {}", msg),
            HeadError::TensorRead(msg) => write!(f, "Tensor data error: {}", msg),
        }
    }
}

impl std::error::Error for HeadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HeadError::Io(err) => Some(err),
            HeadError::Csv(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for HeadError {
    fn from(err: std::io::Error) -> Self {
        HeadError::Io(err)
    }
}

impl From<csv::Error> for HeadError {
    fn from(err: csv::Error) -> Self {
        HeadError::Csv(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_parameter() {
        let err = HeadError::invalid_parameter("units", "must be at least 1");
        assert_eq!(err.to_string(), "Invalid parameter 'units': must be at least 1");
    }

    #[test]
    fn io_errors_keep_their_source() {
        let err: HeadError = std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
        assert!(std::error::Error::source(&err).is_some());
    }
}
