//! Extension allow-listing: the first gate an upload has to pass.
//!
//! Only the suffix after the *last* dot is consulted, so `archive.tar.exe`
//! is judged by `exe` and rejected even though `tar` would be fine. This
//! matches how browsers and desktop shells pick the handling application,
//! and it keeps the check independent of the file's actual content — content
//! sniffing is the conversion engine's job, not ours.

/// File extensions the service will accept, lower-case.
///
/// Everything here is a format the conversion engine understands natively,
/// except `gif`, which [`crate::convert::MarkdownEngine`] pre-transcodes to
/// PNG before delegating.
pub const ALLOWED_EXTENSIONS: [&str; 14] = [
    "pdf", "docx", "pptx", "xlsx", "png", "jpg", "jpeg", "gif", "mp3", "wav", "html", "csv",
    "json", "xml",
];

/// Check whether `filename` carries an allow-listed extension.
///
/// Returns `false` for names without a dot, for a bare `"."`, and for any
/// suffix outside [`ALLOWED_EXTENSIONS`]. The comparison is
/// case-insensitive: `sample.HTML` passes.
pub fn is_allowed(filename: &str) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => {
            let ext = ext.to_ascii_lowercase();
            ALLOWED_EXTENSIONS.contains(&ext.as_str())
        }
        _ => false,
    }
}
