//! Field-format helpers shared by the auth boundary and the application
//! draft validators.

/// Minimum accepted password length at registration
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Basic email format check: one local part, one domain with a dot,
/// no whitespace. Deliberately loose; the mail server is the real judge.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.is_empty() || email.contains(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("jane@x.com"));
        assert!(is_valid_email("first.last@sub.example.org"));
        assert!(is_valid_email("  padded@x.com  "));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("@x.com"));
        assert!(!is_valid_email("jane@"));
        assert!(!is_valid_email("jane@nodot"));
        assert!(!is_valid_email("jane@.com"));
        assert!(!is_valid_email("jane@x."));
        assert!(!is_valid_email("two@at@x.com"));
        assert!(!is_valid_email("spa ce@x.com"));
    }
}
