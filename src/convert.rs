//! The conversion adapter: a staged file in, Markdown text out.
//!
//! ## Why an adapter at all?
//!
//! The heavy lifting — PDF text extraction, OOXML parsing, OCR, audio
//! transcription — belongs to the external engine ([`extractous`], Apache
//! Tika under the hood) and is deliberately not reproduced here. The adapter
//! owns exactly two things: the one format quirk the engine cannot handle
//! (GIF container framing, worked around by re-encoding to PNG first) and
//! the translation of engine failures into [`ConvertError`].
//!
//! [`MarkdownEngine`] is a stateless handle: it holds configuration only,
//! no mutable fields, and is safe to share across concurrent requests. The
//! underlying FFI `Extractor` is constructed fresh inside each call, so no
//! engine state can leak between requests.

use crate::error::ConvertError;
use extractous::Extractor;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Stateless handle to the external conversion engine.
#[derive(Debug, Clone)]
pub struct MarkdownEngine {
    /// Upper bound on extracted text length, in characters. Inputs that
    /// decode to more text than this are truncated by the engine rather
    /// than ballooning the response body.
    max_text_chars: usize,
}

impl Default for MarkdownEngine {
    fn default() -> Self {
        Self {
            // extractous' own default; large enough for any realistic
            // single-document upload.
            max_text_chars: 500_000,
        }
    }
}

impl MarkdownEngine {
    /// Create an engine handle with a custom text-length cap.
    pub fn new(max_text_chars: usize) -> Self {
        Self { max_text_chars }
    }

    /// Convert the file at `path` to Markdown text.
    ///
    /// GIF inputs are re-encoded as PNG into the same directory first,
    /// because the engine does not understand GIF container framing.
    /// Animated GIFs collapse to their first frame; that is accepted.
    ///
    /// The call is blocking (the engine is synchronous); async callers
    /// should wrap it in `tokio::task::spawn_blocking`.
    pub fn convert(&self, path: &Path) -> Result<String, ConvertError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        let transcoded;
        let effective_path = if extension.as_deref() == Some("gif") {
            transcoded = transcode_gif_to_png(path)?;
            transcoded.as_path()
        } else {
            path
        };

        self.extract(effective_path)
    }

    /// Hand a path straight to the engine and drain the text stream.
    fn extract(&self, path: &Path) -> Result<String, ConvertError> {
        debug!("Converting file: {}", path.display());

        let bytes = std::fs::read(path).map_err(|e| ConvertError::Engine {
            message: e.to_string(),
        })?;

        // A fresh Extractor per call: the FFI object is cheap to build and
        // holds the only engine state there is.
        let extractor = Extractor::new().set_extract_string_max_length(self.max_text_chars as i32);

        let (mut reader, _metadata) =
            extractor
                .extract_bytes(&bytes)
                .map_err(|e| ConvertError::Engine {
                    message: e.to_string(),
                })?;

        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(|e| ConvertError::Engine {
                message: e.to_string(),
            })?;

        info!(
            "Conversion successful: {} → {} chars",
            path.display(),
            text.len()
        );
        Ok(text)
    }
}

/// Re-encode a GIF as PNG next to the original and return the PNG's path.
///
/// The copy lands in the same (scratch) directory as the input, so it is
/// deleted together with everything else when the request completes.
fn transcode_gif_to_png(input: &Path) -> Result<PathBuf, ConvertError> {
    let img = image::open(input).map_err(|e| ConvertError::Transcode {
        message: e.to_string(),
    })?;

    let png_path = input.with_extension("png");
    img.save_with_format(&png_path, image::ImageFormat::Png)
        .map_err(|e| ConvertError::Transcode {
            message: e.to_string(),
        })?;

    debug!(
        "Transcoded {} → {}",
        input.display(),
        png_path.display()
    );
    Ok(png_path)
}
