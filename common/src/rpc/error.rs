use thiserror::Error;

pub type JsonRPCResult<T> = Result<T, JsonRPCError>;

#[derive(Debug, Error)]
pub enum JsonRPCError {
    // the request never reached a well-formed JSON-RPC answer
    #[error(transparent)]
    ConnectionError(#[from] reqwest::Error),
    #[error("HTTP error {}", _0)]
    HttpStatus(u16),
    // the server answered, with an error
    #[error("Server returned error code {code}: {message}")]
    ServerError { code: i16, message: String },
    #[error("Server answered with neither result nor error")]
    MissingResult,
    #[error("Expected jsonrpc set to '2.0', got '{}'", _0)]
    InvalidVersion(String),
}
