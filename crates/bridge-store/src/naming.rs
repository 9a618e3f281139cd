//! File names for deploy outputs.

use chrono::NaiveDateTime;

/// Backup timestamp format, second resolution.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// `{code}.json`
pub fn layout_file_name(code: &str) -> String {
    format!("{code}.json")
}

/// `bt{file_num}.js`
pub fn logic_file_name(file_num: &str) -> String {
    format!("bt{file_num}.js")
}

/// Formats a backup timestamp as `YYYYMMDD_HHMMSS`.
pub fn format_timestamp(at: &NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// `bt{file_num}_{timestamp}.js`, with `_{attempt}` appended when an earlier
/// backup already took the plain name within the same second.
pub fn backup_file_name(file_num: &str, timestamp: &str, attempt: u32) -> String {
    match attempt {
        0 => format!("bt{file_num}_{timestamp}.js"),
        n => format!("bt{file_num}_{timestamp}_{n}.js"),
    }
}
