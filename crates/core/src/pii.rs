use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}").expect("email regex"));
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+?\d{1,3}[ -]?)?(?:\(?\d{3}\)?[ -]?)?\d{3}[ -]?\d{4}").expect("phone regex")
});
static NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Z][a-z]{2,}\b").expect("name regex"));

/// Phone candidates shorter than this (digits only) are discarded as noise.
const MIN_PHONE_DIGITS: usize = 10;
/// Name detection stops after this many raw matches.
const MAX_NAME_MATCHES: usize = 10;

/// Detected personally identifying strings, each list de-duplicated in
/// first-seen order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PiiInfo {
    pub emails: Vec<String>,
    pub phones: Vec<String>,
    pub names: Vec<String>,
}

impl PiiInfo {
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty() && self.phones.is_empty() && self.names.is_empty()
    }
}

/// Detection is pluggable so a stronger model can replace the regex
/// heuristics without touching the redaction contract.
pub trait PiiDetector: Send + Sync {
    fn extract(&self, text: &str) -> PiiInfo;
}

/// Regex-based detector. The capitalized-token name heuristic is high-recall
/// and low-precision by intent; it is not a named-entity model and will flag
/// ordinary capitalized words.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexPiiDetector;

impl PiiDetector for RegexPiiDetector {
    fn extract(&self, text: &str) -> PiiInfo {
        let mut emails = IndexSet::new();
        for m in EMAIL_RE.find_iter(text) {
            emails.insert(m.as_str().to_string());
        }
        let mut phones = IndexSet::new();
        for m in PHONE_RE.find_iter(text) {
            let digits = m.as_str().chars().filter(|c| c.is_ascii_digit()).count();
            if digits >= MIN_PHONE_DIGITS {
                phones.insert(m.as_str().to_string());
            }
        }
        let mut names = IndexSet::new();
        for m in NAME_RE.find_iter(text).take(MAX_NAME_MATCHES) {
            names.insert(m.as_str().to_string());
        }
        PiiInfo {
            emails: emails.into_iter().collect(),
            phones: phones.into_iter().collect(),
            names: names.into_iter().collect(),
        }
    }
}

/// Extracts PII with the default regex detector.
pub fn extract_pii(text: &str) -> PiiInfo {
    RegexPiiDetector.extract(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_emails_case_insensitively() {
        let pii = extract_pii("reach me at Jane.Doe+hr@Example.COM today");
        assert_eq!(pii.emails, vec!["Jane.Doe+hr@Example.COM"]);
    }

    #[test]
    fn deduplicates_preserving_first_seen_order() {
        let pii = extract_pii("b@x.com then a@y.org then b@x.com again");
        assert_eq!(pii.emails, vec!["b@x.com", "a@y.org"]);
    }

    #[test]
    fn short_digit_runs_are_not_phones() {
        let pii = extract_pii("room 123-4567 is open");
        assert!(pii.phones.is_empty());
    }

    #[test]
    fn accepts_common_phone_shapes() {
        let pii = extract_pii("call (555) 123-4567 or +1 555 987 6543");
        assert_eq!(pii.phones.len(), 2);
        assert_eq!(pii.phones[0], "(555) 123-4567");
    }

    #[test]
    fn names_are_capitalized_tokens_of_three_or_more() {
        let pii = extract_pii("Jane met Bob and Al and ALICE in Amsterdam");
        // "Al" is too short, "ALICE" is not capitalized-then-lowercase.
        assert_eq!(pii.names, vec!["Jane", "Bob", "Amsterdam"]);
    }

    #[test]
    fn name_scan_stops_after_ten_matches() {
        let text = "Aaa Bbb Ccc Ddd Eee Fff Ggg Hhh Iii Jjj Kkk Lll";
        let pii = extract_pii(text);
        assert_eq!(pii.names.len(), 10);
        assert!(!pii.names.contains(&"Kkk".to_string()));
    }

    #[test]
    fn jane_doe_scenario() {
        let pii = extract_pii("Contact Jane Doe at jane@x.com or 555-123-4567.");
        assert_eq!(pii.emails, vec!["jane@x.com"]);
        assert_eq!(pii.phones, vec!["555-123-4567"]);
        assert!(pii.names.contains(&"Jane".to_string()));
        assert!(pii.names.contains(&"Doe".to_string()));
    }
}
