/// Error types that can occur while fitting or evaluating a tree
///
/// # Variants
///
/// - `NotFitted` - Indicates that the tree has not been fitted yet
/// - `InputValidationError` - indicates the input data provided does not meet the expected format or validation rules
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    NotFitted,
    InputValidationError(String),
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::NotFitted => {
                write!(
                    f,
                    "Model has not been fitted. Prediction and evaluation require a fitted tree."
                )
            }
            ModelError::InputValidationError(msg) => write!(f, "Input validation error: {}", msg),
        }
    }
}

/// Implements the standard error trait for ModelError
impl std::error::Error for ModelError {}

/// Input/Output error types that can occur while loading snapshots and configuration files
///
/// # Variants
///
/// - `StdIoError` - Wraps standard I/O errors from file system operations
/// - `JsonError` - Wraps JSON deserialization errors
#[derive(Debug)]
pub enum IoError {
    StdIoError(std::io::Error),
    JsonError(serde_json::Error),
}

impl IoError {
    pub fn load_in_buf_reader(
        path: impl AsRef<std::path::Path>,
    ) -> Result<std::io::BufReader<std::fs::File>, IoError> {
        let file = std::fs::File::open(path).map_err(IoError::StdIoError)?;
        Ok(std::io::BufReader::new(file))
    }
}

impl std::fmt::Display for IoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IoError::StdIoError(e) => write!(f, "IO error: {}", e),
            IoError::JsonError(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for IoError {}

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::StdIoError(e)
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        IoError::JsonError(e)
    }
}
