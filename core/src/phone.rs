//! Phone number utilities

use once_cell::sync::Lazy;
use regex::Regex;

// China mobile number: leading 1, second digit 3-9, 9 more digits
static MOBILE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^1[3-9]\d{9}$").unwrap());

/// Normalize a phone number by stripping every non-digit character
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Check whether a normalized phone number is a valid mobile number
pub fn is_valid_mobile(phone: &str) -> bool {
    MOBILE_REGEX.is_match(phone)
}

/// Mask a phone number for log output (e.g. 138****8000)
pub fn mask_phone(phone: &str) -> String {
    if phone.len() >= 7 {
        format!("{}****{}", &phone[0..3], &phone[phone.len() - 4..])
    } else {
        "****".to_string()
    }
}
