/// Failure raised while matching an argument vector against a command.
///
/// The message carries the command header as a prefix, followed by one of the
/// fixed templates (`unrecognized option: --NAME`, `argument required: -C`,
/// `invalid argument: PLACEHOLDER=TEXT`, `command required`, ...), so it can
/// be printed to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct Error {
    message: String,
}

impl Error {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The full message, including the command-header prefix.
    pub fn message(&self) -> &str {
        &self.message
    }
}

pub type Result<T> = std::result::Result<T, Error>;
