//! Input validation utilities
//!
//! Local checks that gate network calls: malformed input is rejected here
//! and never reaches the backend.

use std::sync::OnceLock;

use regex::Regex;

/// Upper bound on tagline length, in characters.
pub const TAGLINE_MAX_CHARS: usize = 120;

/// Check basic mailbox syntax: `local@domain.tld`, no whitespace.
///
/// Deliberately loose; the backend is the authority on whether a profile
/// exists for the address; this only filters obvious typos.
pub fn email_is_valid(email: &str) -> bool {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Failed to compile email regex")
    });
    regex.is_match(email)
}

/// Check that a verification code is exactly six ASCII digits.
pub fn code_is_valid(code: &str) -> bool {
    code.len() == 6 && code.bytes().all(|b| b.is_ascii_digit())
}

/// Normalize a phone number into grouped digits.
///
/// Strips everything but digits (and a leading `+`), then groups the digits
/// in threes from the right: `"+216 12-345-678"` becomes `"+21 612 345 678"`.
/// An input without digits normalizes to the empty string.
pub fn normalize_phone(raw: &str) -> String {
    let has_prefix = raw.trim_start().starts_with('+');
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return String::new();
    }

    let mut groups: Vec<&str> = Vec::new();
    let head = digits.len() % 3;
    if head > 0 {
        groups.push(&digits[..head]);
    }
    let mut idx = head;
    while idx < digits.len() {
        groups.push(&digits[idx..idx + 3]);
        idx += 3;
    }

    let body = groups.join(" ");
    if has_prefix { format!("+{body}") } else { body }
}
