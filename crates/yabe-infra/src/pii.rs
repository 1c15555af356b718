//! Helpers to keep personal data out of logs.

/// Mask an email for logging: `bob@gmail.com` becomes `b***@gmail.com`.
pub(crate) fn mask_email(email: &str) -> String {
    match email.find('@') {
        Some(at_pos) => {
            let (local, domain) = email.split_at(at_pos);
            let masked_local = match local.chars().next() {
                Some(first) if local.chars().count() > 1 => format!("{first}***"),
                _ => "***".to_string(),
            };
            format!("{masked_local}{domain}")
        }
        None => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("bob@gmail.com"), "b***@gmail.com");
        assert_eq!(mask_email("b@gmail.com"), "***@gmail.com");
        assert_eq!(mask_email("not-an-email"), "***");
        assert_eq!(mask_email("élodie@hot.ee"), "é***@hot.ee");
    }
}
