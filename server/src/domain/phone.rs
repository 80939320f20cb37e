//! Teacher phone validation
//!
//! Phones are stored normalized as `+61` followed by exactly nine digits.
//! Incoming values may carry spaces, hyphens or parentheses; those are
//! stripped before validation.

/// Strip formatting characters, keeping digits and a leading `+`
fn normalize(input: &str) -> String {
    input
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Normalize and validate an Australian phone number.
///
/// Returns the canonical `+61#########` form, or `None` when the input is
/// not a valid AU number.
pub fn normalize_au_phone(input: &str) -> Option<String> {
    let s = normalize(input);
    let rest = s.strip_prefix("+61")?;
    if rest.len() == 9 && rest.chars().all(|c| c.is_ascii_digit()) {
        Some(s)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_form_accepted() {
        assert_eq!(
            normalize_au_phone("+61412345678").as_deref(),
            Some("+61412345678")
        );
    }

    #[test]
    fn test_spaces_stripped_then_accepted() {
        assert_eq!(
            normalize_au_phone("+61 412 345 678").as_deref(),
            Some("+61412345678")
        );
        assert_eq!(
            normalize_au_phone("+61-412-345-678").as_deref(),
            Some("+61412345678")
        );
        assert_eq!(
            normalize_au_phone("+61 (412) 345 678").as_deref(),
            Some("+61412345678")
        );
    }

    #[test]
    fn test_missing_country_code_rejected() {
        assert_eq!(normalize_au_phone("0412345678"), None);
        assert_eq!(normalize_au_phone("61412345678"), None);
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert_eq!(normalize_au_phone("+6141234567"), None); // 8 digits
        assert_eq!(normalize_au_phone("+614123456789"), None); // 10 digits
        assert_eq!(normalize_au_phone("+61"), None);
    }

    #[test]
    fn test_non_digits_rejected() {
        assert_eq!(normalize_au_phone("+61abc345678"), None);
        assert_eq!(normalize_au_phone(""), None);
    }
}
