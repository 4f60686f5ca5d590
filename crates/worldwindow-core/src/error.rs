use thiserror::Error;
use worldwindow_api::ApiError;

/// Everything the controllers and the config layer can fail with
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A controller already has a request in flight
    #[error("{0} request already in flight")]
    Busy(&'static str),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn is_busy(&self) -> bool {
        matches!(self, Error::Busy(_))
    }
}
