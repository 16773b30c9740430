use crate::models::Region;

const UNICODE_MINUS: char = '\u{2212}';

/// Value of the first pair in `region` whose label is exactly `label`.
///
/// Missing regions and unknown labels give an empty string. Unicode minus
/// signs in the value become ASCII hyphens so amounts stay plain text.
pub fn extract_field(region: Option<&Region>, label: &str) -> String {
    let Some(region) = region else {
        return String::new();
    };

    region
        .pairs
        .iter()
        .find(|pair| pair.label.trim() == label)
        .map(|pair| pair.value.trim().replace(UNICODE_MINUS, "-"))
        .unwrap_or_default()
}

/// First non-empty value among `labels`, in order.
pub fn extract_first(region: Option<&Region>, labels: &[&str]) -> String {
    labels
        .iter()
        .map(|label| extract_field(region, label))
        .find(|value| !value.is_empty())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region() -> Region {
        Region::new("r")
            .with_pair("Date", "June 3, 2024")
            .with_pair(" Amount ", " \u{2212}$1,204.10 ")
            .with_pair("Status", "Completed")
            .with_pair("Date", "ignored")
    }

    #[test]
    fn test_missing_region_is_empty() {
        assert_eq!(extract_field(None, "Date"), "");
    }

    #[test]
    fn test_unknown_label_is_empty() {
        assert_eq!(extract_field(Some(&region()), "Memo"), "");
    }

    #[test]
    fn test_exact_case_sensitive_match() {
        let r = region();
        assert_eq!(extract_field(Some(&r), "Date"), "June 3, 2024");
        assert_eq!(extract_field(Some(&r), "date"), "");
        assert_eq!(extract_field(Some(&r), "Stat"), "");
    }

    #[test]
    fn test_unicode_minus_becomes_hyphen() {
        assert_eq!(extract_field(Some(&region()), "Amount"), "-$1,204.10");

        let r = Region::new("r").with_pair("Note", "a \u{2212} b \u{2013} c");
        assert_eq!(extract_field(Some(&r), "Note"), "a - b \u{2013} c");
    }

    #[test]
    fn test_extract_first_falls_back() {
        let r = Region::new("r").with_pair("Account", "TFSA");
        assert_eq!(extract_first(Some(&r), &["From", "Account"]), "TFSA");

        let r = r.with_pair("From", "Chequing");
        assert_eq!(extract_first(Some(&r), &["From", "Account"]), "Chequing");

        assert_eq!(extract_first(None, &["From", "Account"]), "");
    }
}
