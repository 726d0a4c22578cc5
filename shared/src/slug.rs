//! Storefront slug derivation
//!
//! A tenant's slug is the URL-safe identifier of its public storefront.
//! It is derived once at provisioning time from the intended store name
//! plus a short suffix taken from the auth subject, and is immutable
//! afterwards.

use uuid::Uuid;

/// Base used when the store name yields no usable characters.
const FALLBACK_BASE: &str = "new-store";

/// Derive the storefront slug for `store_name`.
///
/// Lowercases the name, turns whitespace runs into single hyphens,
/// drops everything that is not ascii-alphanumeric or a hyphen and
/// collapses the hyphen runs that leaves behind, then appends the first
/// four hex characters of the subject id for uniqueness.
///
/// Deterministic: the same (name, subject) pair always produces the
/// same slug, which is what makes provisioning retryable.
pub fn derive(store_name: &str, subject: &Uuid) -> String {
    let mut base = String::with_capacity(store_name.len());
    for c in store_name.to_lowercase().chars() {
        let mapped = if c.is_whitespace() { '-' } else { c };
        if mapped == '-' || mapped.is_ascii_alphanumeric() {
            if mapped == '-' && base.ends_with('-') {
                continue;
            }
            base.push(mapped);
        }
    }
    let base = base.trim_matches('-');
    let base = if base.is_empty() { FALLBACK_BASE } else { base };

    let subject_hex = subject.simple().to_string();
    format!("{}-{}", base, &subject_hex[..4])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject() -> Uuid {
        Uuid::parse_str("ab12cd34-0000-0000-0000-000000000000").unwrap()
    }

    #[test]
    fn slug_is_lowercase_alnum_hyphen_only() {
        let slug = derive("Café König!!", &subject());
        assert!(
            slug.chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        );
        assert!(slug.ends_with("-ab12"));
        // non-ascii letters are dropped, no hyphen runs remain
        assert_eq!(slug, "caf-knig-ab12");
    }

    #[test]
    fn whitespace_collapses_to_single_hyphen() {
        assert_eq!(derive("Brew  Bar", &subject()), "brew-bar-ab12");
    }

    #[test]
    fn punctuation_leaves_no_double_hyphens() {
        assert_eq!(derive("Tea & Toast", &subject()), "tea-toast-ab12");
    }

    #[test]
    fn empty_name_falls_back() {
        assert_eq!(derive("!!!", &subject()), "new-store-ab12");
        assert_eq!(derive("", &subject()), "new-store-ab12");
    }

    #[test]
    fn derivation_is_deterministic() {
        assert_eq!(
            derive("Morning Cup", &subject()),
            derive("Morning Cup", &subject())
        );
    }
}
