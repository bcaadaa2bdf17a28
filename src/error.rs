//! Error types for the file2md service.
//!
//! Two distinct error types reflect the two layers of the service:
//!
//! * [`ConvertError`] — the conversion adapter failed: the external engine
//!   rejected the input, or the GIF→PNG pre-transform could not decode the
//!   image. Always a server-side failure.
//!
//! * [`ApiError`] — everything a request can die of, including the
//!   client-caused cases (missing part, empty filename, disallowed
//!   extension). The HTTP layer performs the single translation from these
//!   variants to status codes; nothing below it knows about HTTP.
//!
//! Client-caused variants are never retried and carry fixed, predictable
//! messages the front-end matches on. Server-side variants pass the
//! underlying message through verbatim for diagnostics.

use thiserror::Error;

/// Failures from the conversion adapter.
///
/// Each failure wraps the underlying engine or image-library message into a
/// single descriptive string. Calls are independent; nothing is retried.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The external conversion engine rejected the staged file.
    #[error("Failed to convert file: {message}")]
    Engine { message: String },

    /// The GIF input could not be decoded or re-encoded as PNG.
    #[error("Failed to transcode GIF to PNG: {message}")]
    Transcode { message: String },
}

/// All the ways a `/convert` request can fail.
///
/// The server layer maps these to HTTP status codes: the first four variants
/// are client errors (400), the rest are internal failures (500).
#[derive(Debug, Error)]
pub enum ApiError {
    /// The multipart body had no `file` field.
    #[error("No file uploaded")]
    NoFilePart,

    /// The `file` field carried an empty filename.
    #[error("No file selected")]
    NoFileName,

    /// The filename's extension is not on the allow-list.
    #[error("File type not supported")]
    UnsupportedType,

    /// The multipart body itself could not be parsed.
    #[error("Malformed multipart request: {message}")]
    Multipart { message: String },

    /// Creating the scratch directory or writing the upload failed.
    #[error("Staging failed: {source}")]
    Staging {
        #[source]
        source: std::io::Error,
    },

    /// The conversion adapter failed.
    #[error(transparent)]
    Conversion(#[from] ConvertError),

    /// Unexpected internal error (e.g. a panicked worker task).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for ApiError {
    fn from(source: std::io::Error) -> Self {
        ApiError::Staging { source }
    }
}

impl ApiError {
    /// Whether the client caused this failure (→ 400) as opposed to the
    /// service (→ 500).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ApiError::NoFilePart
                | ApiError::NoFileName
                | ApiError::UnsupportedType
                | ApiError::Multipart { .. }
        )
    }
}
