//! The three report lines a verbose timer prints. Their layout is a fixed
//! contract: tools parse it, so it is not configurable.

use chrono::NaiveDateTime;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Display form of a label.
pub fn normalize_label(label: &str) -> String {
    label.to_uppercase()
}

pub fn start_marker(label: &str, at: NaiveDateTime) -> String {
    format!("[START_{label}]: {}", at.format(TIMESTAMP_FORMAT))
}

pub fn end_marker(label: &str, at: NaiveDateTime) -> String {
    format!("[END_{label}]: {}", at.format(TIMESTAMP_FORMAT))
}

pub fn cost_summary(label: &str, elapsed_secs: f64) -> String {
    format!("{label} cost: {elapsed_secs:.4} s")
}
