//! Shared validation helpers used by the section validators.

/// Push an error if `value` is outside `[min, max]` (integer).
pub(crate) fn validate_range(errors: &mut Vec<String>, name: &str, value: u64, min: u64, max: u64) {
    if value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}

/// Push an error if `value` is empty or longer than `max_chars`.
pub(crate) fn validate_text(errors: &mut Vec<String>, name: &str, value: &str, max_chars: usize) {
    if value.trim().is_empty() {
        errors.push(format!("{name} must not be empty"));
    } else if value.chars().count() > max_chars {
        errors.push(format!("{name} exceeds {max_chars} characters"));
    }
}

/// Push an error if `value` is not one of `allowed`.
pub(crate) fn validate_one_of(errors: &mut Vec<String>, name: &str, value: &str, allowed: &[&str]) {
    if !allowed.contains(&value) {
        errors.push(format!(
            "{name} = \"{value}\" is not one of [{}]",
            allowed.join(", ")
        ));
    }
}
