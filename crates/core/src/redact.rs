use regex::{NoExpand, Regex};

use crate::pii::PiiInfo;

pub const EMAIL_PLACEHOLDER: &str = "[REDACTED_EMAIL]";
pub const PHONE_PLACEHOLDER: &str = "[REDACTED_PHONE]";

/// Rewrites `text` replacing detected PII with placeholders. Emails and
/// phones are replaced before names: a name match inside an address would
/// otherwise corrupt it before the address rule ran. Names become their
/// first letter plus a period, matched on word boundaries only. Running
/// redaction again over already-redacted text is a no-op.
pub fn redact(text: &str, pii: &PiiInfo) -> String {
    let mut redacted = text.to_string();
    for email in &pii.emails {
        redacted = redacted.replace(email.as_str(), EMAIL_PLACEHOLDER);
    }
    for phone in &pii.phones {
        redacted = redacted.replace(phone.as_str(), PHONE_PLACEHOLDER);
    }
    for name in &pii.names {
        let Some(initial) = name.chars().next() else {
            continue;
        };
        // escaped literal, cannot fail to compile
        let word = Regex::new(&format!(r"\b{}\b", regex::escape(name))).expect("name pattern");
        let replacement = format!("{initial}.");
        redacted = word
            .replace_all(&redacted, NoExpand(replacement.as_str()))
            .into_owned();
    }
    redacted
}
