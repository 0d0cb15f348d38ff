//! API-friendly types: request bodies as received and response bodies as sent.

pub mod results;
pub mod user;
pub mod vote;

/// The `status` field of every successful write response.
pub const SUCCESS: &str = "success";

/// Treat absent, empty and whitespace-only fields alike as missing.
/// Returns the trimmed value otherwise.
pub(crate) fn non_blank(field: Option<String>) -> Option<String> {
    field
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Treat absent, empty and whitespace-only fields alike as missing.
/// Returns the value untouched otherwise.
pub(crate) fn present(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.trim().is_empty())
}
