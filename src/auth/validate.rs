//! Field validators shared by HTTP handlers and direct service calls.
//! Each validator returns `None` when the value passes, or a human-readable
//! message describing the first failure.

/// Validate a required text field with inclusive length bounds.
pub fn validate_length(value: &str, field_name: &str, min_len: usize, max_len: usize) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.len() < min_len {
        if min_len <= 1 {
            return Some(format!("{field_name} is required"));
        }
        return Some(format!("{field_name} must be at least {min_len} characters"));
    }
    if trimmed.len() > max_len {
        return Some(format!("{field_name} must be at most {max_len} characters"));
    }
    None
}

/// Validate an optional text field with a max length (empty is OK).
pub fn validate_optional(value: &str, field_name: &str, max_len: usize) -> Option<String> {
    let trimmed = value.trim();
    if !trimmed.is_empty() && trimmed.len() > max_len {
        return Some(format!("{field_name} must be at most {max_len} characters"));
    }
    None
}

/// Validate an email: must contain '@' and '.', max 254 chars.
pub fn validate_email(email: &str) -> Option<String> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Some("Email is required".to_string());
    }
    if trimmed.len() > 254 {
        return Some("Email must be at most 254 characters".to_string());
    }
    if !trimmed.contains('@') || !trimmed.contains('.') {
        return Some("Email must be a valid address (contain '@' and '.')".to_string());
    }
    None
}

/// Validate a phone number: 6-20 chars, digits with optional leading '+',
/// spaces and dashes allowed.
pub fn validate_phone(phone: &str) -> Option<String> {
    let trimmed = phone.trim();
    if trimmed.is_empty() {
        return Some("Phone number is required".to_string());
    }
    let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() < 6 || digits.len() > 20 {
        return Some("Phone number must contain 6-20 digits".to_string());
    }
    let valid_chars = trimmed
        .chars()
        .enumerate()
        .all(|(i, c)| c.is_ascii_digit() || c == ' ' || c == '-' || (c == '+' && i == 0));
    if !valid_chars {
        return Some("Phone number may only contain digits, spaces, dashes, and a leading '+'".to_string());
    }
    None
}

/// Validate a budget range: both non-negative, min <= max.
pub fn validate_budget_range(budget_min: i64, budget_max: i64) -> Option<String> {
    if budget_min < 0 || budget_max < 0 {
        return Some("Budget values must be non-negative".to_string());
    }
    if budget_min > budget_max {
        return Some("Minimum budget must not exceed maximum budget".to_string());
    }
    None
}
