//! Phone number shapes and the live-formatting input buffer.

use once_cell::sync::Lazy;
use regex::Regex;

const MAX_DIGITS: usize = 11;

static CANONICAL_PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\d{3}-\d{3}-\d{4}|\d-\d{3}-\d{3}-\d{4})$").expect("canonical phone regex")
});

/// `NNN-NNN-NNNN` or `N-NNN-NNN-NNNN`.
pub fn is_canonical_phone(phone: &str) -> bool {
    CANONICAL_PHONE.is_match(phone)
}

/// Canonical display shape for a stored number. Ten or eleven raw digits get
/// their hyphens; anything else is returned as is.
pub fn format_phone(phone: &str) -> String {
    if is_canonical_phone(phone) || !phone.chars().all(|c| c.is_ascii_digit()) {
        return phone.to_string();
    }
    match phone.len() {
        10 | 11 => hyphenate(phone),
        _ => phone.to_string(),
    }
}

fn hyphenate(digits: &str) -> String {
    match digits.len() {
        0..=3 => digits.to_string(),
        4..=6 => format!("{}-{}", &digits[..3], &digits[3..]),
        7..=10 => format!("{}-{}-{}", &digits[..3], &digits[3..6], &digits[6..]),
        _ => format!(
            "{}-{}-{}-{}",
            &digits[..1],
            &digits[1..4],
            &digits[4..7],
            &digits[7..]
        ),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneKey {
    Char(char),
    Backspace,
    Delete,
    Tab,
    Left,
    Right,
    Home,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Accepted,
    Rejected,
}

/// Digits typed into the phone field. The displayed value gains hyphens as
/// digits arrive and settles on a canonical shape at ten or eleven digits.
///
/// The caret always sits after the last digit. A stored number that is not
/// ten or eleven digits long is held verbatim until the first editing key,
/// which starts the field over.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhoneInput {
    digits: String,
    stored: Option<String>,
}

impl PhoneInput {
    /// Replays `raw` one key at a time, dropping whatever the field would
    /// refuse.
    pub fn typed(raw: &str) -> Self {
        let mut input = Self::default();
        for c in raw.chars() {
            input.handle_key(PhoneKey::Char(c));
        }
        input
    }

    pub fn handle_key(&mut self, key: PhoneKey) -> KeyOutcome {
        match key {
            PhoneKey::Char(c) if c.is_ascii_digit() => {
                if self.stored.take().is_some() {
                    self.digits.clear();
                }
                if self.digits.len() >= MAX_DIGITS {
                    return KeyOutcome::Rejected;
                }
                self.digits.push(c);
                KeyOutcome::Accepted
            }
            PhoneKey::Char(_) => KeyOutcome::Rejected,
            PhoneKey::Backspace => {
                if self.stored.take().is_none() {
                    self.digits.pop();
                }
                KeyOutcome::Accepted
            }
            // Nothing lies to the right of the caret.
            PhoneKey::Delete => {
                self.stored = None;
                KeyOutcome::Accepted
            }
            PhoneKey::Tab | PhoneKey::Left | PhoneKey::Right | PhoneKey::Home | PhoneKey::End => {
                KeyOutcome::Accepted
            }
        }
    }

    /// Loads an existing number. Ten or eleven digits are re-shaped
    /// canonically; any other non-empty value is kept exactly as given.
    pub fn set(&mut self, raw: &str) {
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
        self.stored = None;
        if digits.is_empty() || (10..=MAX_DIGITS).contains(&digits.len()) {
            self.digits = digits;
        } else {
            self.digits.clear();
            self.stored = Some(raw.to_string());
        }
    }

    pub fn clear(&mut self) {
        self.digits.clear();
        self.stored = None;
    }

    /// Typed digits; empty while a stored value is held verbatim.
    pub fn digits(&self) -> &str {
        &self.digits
    }

    pub fn value(&self) -> String {
        match &self.stored {
            Some(stored) => stored.clone(),
            None => hyphenate(&self.digits),
        }
    }
}
