/// Errors raised by the detection core.
///
/// `InsufficientData` and `Input` form the input-error class: the run stops and
/// the caller reports `{ "error": ... }`. `Numerical` errors are recovered by the
/// pipeline as a failed fit.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DetectError {
    #[error("Insufficient data points: {actual} remain after preprocessing, need at least {minimum}.")]
    InsufficientData { actual: usize, minimum: usize },

    #[error("{0}")]
    Input(String),

    #[error("Numerical error: {0}")]
    Numerical(String),
}

impl DetectError {
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input(message.into())
    }

    pub fn numerical(message: impl Into<String>) -> Self {
        Self::Numerical(message.into())
    }

    /// True for malformed or insufficient input (as opposed to numerical trouble).
    pub fn is_input(&self) -> bool {
        matches!(self, Self::InsufficientData { .. } | Self::Input(_))
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<DetectError> for AppError {
    fn from(err: DetectError) -> Self {
        let exit_code = match err {
            DetectError::Input(_) => 2,
            DetectError::InsufficientData { .. } => 3,
            DetectError::Numerical(_) => 4,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
