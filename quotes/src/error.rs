use std::{io, string::FromUtf8Error};

use thiserror::Error;

/// The global `Result` alias of the library.
pub type Result<T> = std::result::Result<T, Error>;

/// The global `Error` enum of the library.
///
/// Failing to find a quotation is not an error: only the markup
/// serializer and the MIME message parser can fail.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot serialize html tree")]
    SerializeHtmlError(#[source] io::Error),
    #[error("cannot convert serialized html tree to utf-8")]
    ConvertHtmlToUtf8Error(#[source] FromUtf8Error),

    #[error("cannot parse message")]
    ParseMessageError,
}
