//! Field normalization applied to records before rendering.

use chrono::{DateTime, Local};

use crate::domain::Message;

/// Timestamp layout used by the Graph API, e.g. `2021-05-01T10:00:00+0000`.
const API_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Layout handed to templates, suitable for SQL `DATETIME` columns.
pub const DISPLAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// How quotes and backslashes are escaped in text fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EscapeMode {
    /// `\` becomes `\\`, `'` becomes `\'`.
    #[default]
    Standard,
    /// Reproduces output of earlier releases: `\` becomes `\\\'`.
    Legacy,
}

/// Reformat an API timestamp for display. The wall-clock time is kept in
/// the timestamp's own offset.
///
/// # Errors
/// Returns the parse error when the input does not match the API layout.
pub fn to_display_time(api_time: &str) -> chrono::ParseResult<String> {
    let parsed = DateTime::parse_from_str(api_time, API_TIME_FORMAT)?;
    Ok(parsed.format(DISPLAY_TIME_FORMAT).to_string())
}

/// Current local time in display layout.
#[must_use]
pub fn now_display_time() -> String {
    Local::now().format(DISPLAY_TIME_FORMAT).to_string()
}

/// Like [`to_display_time`], but falls back to the current time with a
/// warning. `context` names the record in the log line.
#[must_use]
pub fn display_time_or_now(api_time: &str, context: &str) -> String {
    to_display_time(api_time).unwrap_or_else(|e| {
        tracing::warn!(%context, time = %api_time, error = %e, "Cannot convert time, using now");
        now_display_time()
    })
}

/// Escape a text field for inclusion in single-quoted SQL literals.
#[must_use]
pub fn escape_for_storage(text: &str, mode: EscapeMode) -> String {
    let backslash = match mode {
        EscapeMode::Standard => "\\\\",
        EscapeMode::Legacy => "\\\\'",
    };
    text.replace('\\', backslash).replace('\'', "\\'")
}

/// Normalize a message in place: display time, escaped text and sender name.
pub fn normalize_message(message: &mut Message, conversation_id: &str, mode: EscapeMode) {
    message.created_time = display_time_or_now(&message.created_time, conversation_id);
    message.text = escape_for_storage(&message.text, mode);
    message.from.name = escape_for_storage(&message.from.name, mode);
}
