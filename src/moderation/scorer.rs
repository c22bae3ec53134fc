//! Heuristic spam scoring for anonymous submissions.
//!
//! Pure and deterministic: identical input always yields the same score and
//! reasons. Each signal contributes independently to a confidence in [0, 1].

use once_cell::sync::Lazy;
use regex::Regex;

/// Shortened-URL services commonly carried by spam payloads.
static SHORTENER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:bit\.ly|tinyurl\.com|goo\.gl|t\.co|ow\.ly|is\.gd|buff\.ly|cutt\.ly)/")
        .expect("Invalid shortener regex")
});

const SPAM_PHRASES: &[&str] = &[
    "make money fast",
    "guaranteed",
    "work from home",
    "risk free",
    "no investment",
    "double your money",
    "get rich",
    "limited time offer",
    "act now",
    "crypto investment",
];

/// Email domains that indicate a throwaway or fabricated contact.
const FAKE_EMAIL_DOMAINS: &[&str] = &["test.com", "fake.com", "example.com", "mail.com"];

/// Confidence at or above which the submission is outright spam.
const SPAM_THRESHOLD: f64 = 0.8;
/// Confidence at or above which a human reviewer should take a look.
const FLAG_THRESHOLD: f64 = 0.6;

/// Free-text and contact fields of a submission, as seen by the scorer.
#[derive(Debug, Clone, Default)]
pub struct SpamCheckFields<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub contact_email: Option<&'a str>,
    pub contact_phone: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub struct SpamAnalysis {
    pub confidence: f64,
    pub is_spam: bool,
    pub should_flag: bool,
    /// Human-readable reasons in signal order; the first is the top signal
    /// recorded as the flag reason.
    pub reasons: Vec<String>,
}

pub fn detect_spam_patterns(fields: &SpamCheckFields<'_>) -> SpamAnalysis {
    let mut score = 0.0f64;
    let mut reasons = Vec::new();

    let text = format!("{} {}", fields.title, fields.description);
    let text_lower = text.to_lowercase();

    // Excessive capitalization across title + description.
    let letters: Vec<char> = text.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.len() > 10 {
        let upper = letters.iter().filter(|c| c.is_uppercase()).count();
        let ratio = upper as f64 / letters.len() as f64;
        if ratio > 0.6 {
            score += 0.3;
            reasons.push(format!("Excessive capitalization ({:.0}% uppercase)", ratio * 100.0));
        }
    }

    // Any character repeated 4+ times consecutively (covers "!!!!" too).
    if has_repeated_characters(&text, 4) {
        score += 0.15;
        reasons.push("Repeated characters detected".to_string());
    }

    // Known spam phrases.
    let keyword_hits = SPAM_PHRASES
        .iter()
        .filter(|phrase| text_lower.contains(*phrase))
        .count();
    if keyword_hits > 0 {
        score += (0.25 * keyword_hits as f64).min(0.5);
        reasons.push(format!("Spam keywords matched: {keyword_hits}"));
    }

    // Two or more shortened URLs in the description.
    let url_count = SHORTENER_REGEX.find_iter(fields.description).count();
    if url_count >= 2 {
        score += 0.4;
        reasons.push(format!("Suspicious shortened URLs: {url_count}"));
    }

    if let Some(email) = fields.contact_email.map(str::trim).filter(|e| !e.is_empty()) {
        if is_fake_email(email) {
            score += 0.3;
            reasons.push("Contact email uses a throwaway domain".to_string());
        }
    }

    if let Some(phone) = fields.contact_phone.map(str::trim).filter(|p| !p.is_empty()) {
        if is_fake_phone(phone) {
            score += 0.3;
            reasons.push("Contact phone is a repeated or sequential digit run".to_string());
        }
    }

    let confidence = score.min(1.0);
    SpamAnalysis {
        confidence,
        is_spam: confidence >= SPAM_THRESHOLD,
        should_flag: confidence >= FLAG_THRESHOLD,
        reasons,
    }
}

fn has_repeated_characters(text: &str, threshold: usize) -> bool {
    let mut prev = None;
    let mut run = 0usize;
    for c in text.chars() {
        if Some(c) == prev {
            run += 1;
            if run >= threshold {
                return true;
            }
        } else {
            prev = Some(c);
            run = 1;
        }
    }
    false
}

fn is_fake_email(email: &str) -> bool {
    let Some(domain) = email.rsplit('@').next().filter(|d| *d != email) else {
        return false;
    };
    let domain = domain.to_lowercase();
    FAKE_EMAIL_DOMAINS.iter().any(|d| domain == *d)
}

/// A phone of one repeated digit ("0000000000") or a strictly sequential
/// run in either direction ("123456789", "987654321").
fn is_fake_phone(phone: &str) -> bool {
    let digits: Vec<u8> = phone
        .chars()
        .filter(|c| c.is_ascii_digit())
        .map(|c| c as u8 - b'0')
        .collect();
    if digits.len() < 6 {
        return false;
    }
    if digits.iter().all(|d| *d == digits[0]) {
        return true;
    }
    let ascending = digits.windows(2).all(|w| w[1] == (w[0] + 1) % 10);
    let descending = digits.windows(2).all(|w| w[0] == (w[1] + 1) % 10);
    ascending || descending
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields<'a>(title: &'a str, description: &'a str) -> SpamCheckFields<'a> {
        SpamCheckFields {
            title,
            description,
            contact_email: None,
            contact_phone: None,
        }
    }

    #[test]
    fn empty_input_scores_zero() {
        let analysis = detect_spam_patterns(&SpamCheckFields::default());
        assert_eq!(analysis.confidence, 0.0);
        assert!(analysis.reasons.is_empty());
        assert!(!analysis.is_spam);
        assert!(!analysis.should_flag);
    }

    #[test]
    fn clean_submission_not_flagged() {
        let analysis = detect_spam_patterns(&fields(
            "Mobile App Development",
            "Looking for a partner to build a food delivery app for local restaurants.",
        ));
        assert!(!analysis.should_flag);
        assert!(analysis.reasons.is_empty());
    }

    #[test]
    fn deterministic_for_identical_input() {
        let f = fields("GUARANTEED PROFITS!!!!", "Make money fast, risk free!!!!");
        let a = detect_spam_patterns(&f);
        let b = detect_spam_patterns(&f);
        assert_eq!(a.confidence, b.confidence);
        assert_eq!(a.reasons, b.reasons);
    }

    #[test]
    fn stacked_signals_cross_flag_threshold() {
        let analysis = detect_spam_patterns(&SpamCheckFields {
            title: "MAKE MONEY FAST GUARANTEED RETURNS",
            description: "WORK FROM HOME RISK FREE!!!! EVERYTHING GUARANTEED",
            contact_email: Some("winner@fake.com"),
            contact_phone: None,
        });
        assert!(analysis.should_flag, "confidence was {}", analysis.confidence);
        assert!(analysis.reasons.len() >= 3);
    }

    #[test]
    fn shortener_urls_counted() {
        let one = detect_spam_patterns(&fields(
            "Link offer",
            "See bit.ly/abc for the details of this opportunity",
        ));
        assert!(!one.reasons.iter().any(|r| r.contains("shortened URLs")));

        let two = detect_spam_patterns(&fields(
            "Link offer",
            "See bit.ly/abc and tinyurl.com/def for the details",
        ));
        assert!(two.reasons.iter().any(|r| r.contains("shortened URLs: 2")));
    }

    #[test]
    fn fake_contact_patterns() {
        assert!(is_fake_email("anyone@test.com"));
        assert!(!is_fake_email("anyone@gmail.com"));
        assert!(is_fake_phone("1111111111"));
        assert!(is_fake_phone("123456789"));
        assert!(is_fake_phone("987654321"));
        assert!(!is_fake_phone("+47 915 38 274"));
    }

    #[test]
    fn repeated_characters_need_four_in_a_row() {
        assert!(has_repeated_characters("wow!!!!", 4));
        assert!(!has_repeated_characters("wow!!!", 4));
    }
}
