//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Http { .. } => crate::exitcode::UNAVAILABLE,
                InfraError::Application(app) => match app {
                    // A failed fetch carries the loader's error as its source
                    ApplicationError::Fetch { source, .. } => {
                        match source.downcast_ref::<InfraError>() {
                            Some(InfraError::Http { .. }) => crate::exitcode::UNAVAILABLE,
                            _ => crate::exitcode::NOINPUT,
                        }
                    }
                    ApplicationError::Domain(_) => crate::exitcode::DATAERR,
                    ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                    ApplicationError::UnknownNode(_) | ApplicationError::InvalidCommand(_) => {
                        crate::exitcode::USAGE
                    }
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_fetch_failure_when_mapping_exit_code_then_noinput() {
        let err: CliError = ApplicationError::Fetch {
            location: "tree.json".into(),
            source: Box::new(std::io::Error::new(std::io::ErrorKind::NotFound, "gone")),
        }
        .into();
        assert_eq!(err.exit_code(), crate::exitcode::NOINPUT);
    }

    #[test]
    fn given_http_fetch_failure_when_mapping_exit_code_then_unavailable() {
        let err: CliError = ApplicationError::Fetch {
            location: "https://example.com/tree.json".into(),
            source: Box::new(InfraError::Http {
                url: "https://example.com/tree.json".into(),
                message: "status 503 Service Unavailable".into(),
            }),
        }
        .into();
        assert_eq!(err.exit_code(), crate::exitcode::UNAVAILABLE);
    }

    #[test]
    fn given_invalid_args_when_mapping_exit_code_then_usage() {
        let err = CliError::InvalidArgs("search query must not be empty".into());
        assert_eq!(err.exit_code(), crate::exitcode::USAGE);
        assert_eq!(
            err.to_string(),
            "invalid arguments: search query must not be empty"
        );
    }

    #[test]
    fn given_unknown_node_when_mapping_exit_code_then_usage() {
        let err: CliError = ApplicationError::UnknownNode("a > b".into()).into();
        assert_eq!(err.exit_code(), crate::exitcode::USAGE);
        assert_eq!(err.to_string(), "no such node: a > b");
    }
}
