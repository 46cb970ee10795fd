//! CLI error handling with user-friendly messages.

use std::fmt;
use std::process;
use tilevault::coord::CoordError;
use tilevault::engine::EngineError;
use tilevault::provider::ProviderError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(std::io::Error),
    /// Invalid bounding box or zoom range
    Region(CoordError),
    /// Invalid URL template or HTTP client setup failure
    Provider(ProviderError),
    /// Failed to open the failure log
    FailureLog(std::io::Error),
    /// The run aborted on an environment-level error
    Run(EngineError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        if let CliError::Provider(ProviderError::InvalidTemplate(_)) = self {
            eprintln!();
            eprintln!("The URL template must contain all three placeholders, e.g.:");
            eprintln!("  https://tile.example.com/{{z}}/{{x}}/{{y}}.png");
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(e) => write!(f, "Failed to initialize logging: {}", e),
            CliError::Region(e) => write!(f, "Invalid region: {}", e),
            CliError::Provider(e) => write!(f, "Provider setup failed: {}", e),
            CliError::FailureLog(e) => write!(f, "Failed to open failure log: {}", e),
            CliError::Run(e) => write!(f, "Run aborted: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::LoggingInit(e) => Some(e),
            CliError::Region(e) => Some(e),
            CliError::Provider(e) => Some(e),
            CliError::FailureLog(e) => Some(e),
            CliError::Run(e) => Some(e),
        }
    }
}

impl From<CoordError> for CliError {
    fn from(e: CoordError) -> Self {
        CliError::Region(e)
    }
}

impl From<ProviderError> for CliError {
    fn from(e: ProviderError) -> Self {
        CliError::Provider(e)
    }
}

impl From<EngineError> for CliError {
    fn from(e: EngineError) -> Self {
        CliError::Run(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_error_display() {
        let err = CliError::from(CoordError::InvalidZoom(42));
        assert!(err.to_string().starts_with("Invalid region:"));
        assert!(err.to_string().contains("42"));
    }

    #[test]
    fn test_provider_error_display() {
        let err = CliError::from(ProviderError::InvalidTemplate("no {x}".to_string()));
        assert!(err.to_string().starts_with("Provider setup failed:"));
    }
}
