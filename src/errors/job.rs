use thiserror::Error;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("Transport Error: {0}")]
    TransportFailure(String),

    #[error("GraphQL Error: {0}")]
    GraphqlFailure(String),

    #[error("Mutation Error: {0}")]
    MutationFailure(String),

    #[error("Invalid Argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid Response: {0}")]
    InvalidResponse(String),

    #[error("Log File Error: {0}")]
    LogSink(#[from] std::io::Error),
}

impl From<reqwest::Error> for JobError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            JobError::InvalidResponse(err.to_string())
        } else {
            JobError::TransportFailure(err.to_string())
        }
    }
}
