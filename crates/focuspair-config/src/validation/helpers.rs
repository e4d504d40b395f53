//! Shared validation helpers.

/// Push an error if `value` is zero.
pub(crate) fn validate_nonzero(errors: &mut Vec<String>, name: &str, value: u64) {
    if value == 0 {
        errors.push(format!("{name} must be greater than 0"));
    }
}

/// Push an error if `value` exceeds `max`.
pub(crate) fn validate_at_most(errors: &mut Vec<String>, name: &str, value: u64, max: u64) {
    if value > max {
        errors.push(format!("{name} = {value} must be at most {max}"));
    }
}

/// Push an error if `value` is outside `[min, max]`.
pub(crate) fn validate_range_f32(errors: &mut Vec<String>, name: &str, value: f32, min: f32, max: f32) {
    if !(min..=max).contains(&value) {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}
