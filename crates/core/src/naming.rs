//! Session identity and artifact naming.
//!
//! Every uploaded file gets a fresh [`SessionId`]. Storage keys for the source
//! and translated artifacts are derived from that id and the client-supplied
//! file name, so the output key can always be recomputed from the session
//! without a lookup table, and two uploads of `notes.txt` never collide.

use crate::error::CoreError;
use crate::types::SessionId;

/// The only file extension accepted for upload.
pub const ALLOWED_EXTENSION: &str = ".txt";

/// Suffix that replaces the source extension on translated artifacts.
pub const TRANSLATED_SUFFIX: &str = ".translated.txt";

/// Generate a new collision-resistant session identifier (128-bit random).
pub fn new_session_id() -> SessionId {
    uuid::Uuid::new_v4()
}

/// Validate a client-supplied upload file name.
///
/// The name must end in [`ALLOWED_EXTENSION`], have a non-empty stem, and be a
/// bare file name (no directory components).
pub fn validate_upload_name(file_name: &str) -> Result<(), CoreError> {
    let Some(stem) = file_name.strip_suffix(ALLOWED_EXTENSION) else {
        return Err(CoreError::Validation(format!(
            "Only {ALLOWED_EXTENSION} files are allowed."
        )));
    };
    if stem.trim().is_empty() {
        return Err(CoreError::Validation(
            "File name must not be empty".to_string(),
        ));
    }
    validate_key(file_name)
}

/// Validate and normalize the requested target language.
///
/// The language is opaque to this service; it only has to be present.
pub fn validate_language(language: &str) -> Result<String, CoreError> {
    let trimmed = language.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Target language is required".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

/// Storage key for an uploaded source file.
///
/// Convention: `{stem}_{session_id}.txt`
///
/// ```
/// use polyglot_core::naming::source_key;
///
/// let id = uuid::Uuid::nil();
/// assert_eq!(
///     source_key(id, "notes.txt"),
///     "notes_00000000-0000-0000-0000-000000000000.txt"
/// );
/// ```
pub fn source_key(session_id: SessionId, file_name: &str) -> String {
    let stem = file_name
        .strip_suffix(ALLOWED_EXTENSION)
        .unwrap_or(file_name);
    format!("{stem}_{session_id}{ALLOWED_EXTENSION}")
}

/// Storage key for the translated counterpart of `source_key`.
///
/// The last extension is replaced by [`TRANSLATED_SUFFIX`].
///
/// ```
/// use polyglot_core::naming::output_key;
///
/// assert_eq!(output_key("notes_abc.txt"), "notes_abc.translated.txt");
/// ```
pub fn output_key(source_key: &str) -> String {
    let stem = match source_key.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem,
        _ => source_key,
    };
    format!("{stem}{TRANSLATED_SUFFIX}")
}

/// Ensure a storage key is a flat file name that cannot escape the
/// artifact directory.
pub fn validate_key(key: &str) -> Result<(), CoreError> {
    if key.is_empty()
        || key.starts_with('.')
        || key.contains('/')
        || key.contains('\\')
        || key.contains("..")
        || key.chars().any(char::is_control)
    {
        return Err(CoreError::Validation(format!("Invalid file name '{key}'")));
    }
    Ok(())
}
