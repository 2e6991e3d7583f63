// Validation utilities module
// Custom validation functions for domain-specific rules.

use regex::Regex;
use std::sync::OnceLock;
use validator::ValidationError;

static CODE_RE: OnceLock<Regex> = OnceLock::new();

fn code_regex() -> &'static Regex {
    // Department and course codes: 2-12 uppercase letters/digits, e.g. "CSE", "CS101".
    CODE_RE.get_or_init(|| Regex::new(r"^[A-Z0-9]{2,12}$").expect("valid code regex"))
}

/// Validates department and course codes.
pub fn validate_code(code: &str) -> Result<(), ValidationError> {
    if code_regex().is_match(code) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_code"))
    }
}

/// Validates that a day of week is a full English day name.
pub fn validate_day_of_week(day: &str) -> Result<(), ValidationError> {
    const DAYS: [&str; 7] = [
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
        "Sunday",
    ];
    if DAYS.contains(&day) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_day_of_week"))
    }
}

/// Validates a letter grade (A+, A, B+, ... F).
pub fn validate_letter_grade(grade: &str) -> Result<(), ValidationError> {
    const GRADES: [&str; 11] = [
        "A+", "A", "A-", "B+", "B", "B-", "C+", "C", "C-", "D", "F",
    ];
    if GRADES.contains(&grade) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_letter_grade"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_code() {
        assert!(validate_code("CSE").is_ok());
        assert!(validate_code("CS101").is_ok());
        assert!(validate_code("c").is_err());
        assert!(validate_code("cs101").is_err());
        assert!(validate_code("").is_err());
        assert!(validate_code("TOO-LONG-CODE").is_err());
    }

    #[test]
    fn test_validate_day_of_week() {
        assert!(validate_day_of_week("Monday").is_ok());
        assert!(validate_day_of_week("Sunday").is_ok());
        assert!(validate_day_of_week("monday").is_err());
        assert!(validate_day_of_week("Funday").is_err());
    }

    #[test]
    fn test_validate_letter_grade() {
        assert!(validate_letter_grade("A+").is_ok());
        assert!(validate_letter_grade("F").is_ok());
        assert!(validate_letter_grade("E").is_err());
        assert!(validate_letter_grade("a").is_err());
    }
}
