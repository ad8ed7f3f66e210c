// src/wcag.rs
//! WCAG success-criterion extraction.
//!
//! Criterion ids come from two independent sources that are unioned: the
//! structured `wcag` field and free text (`message`, `description`, `code`).
//! Every id is canonicalized to a bare dotted triple, so `"WCAG 1.1.1"`,
//! `"wcag111"` and `"1.1.1"` collapse. Tokens that name no criterion (axe
//! `cat.*`, `best-practice`, `section508`, ...) are dropped.

use crate::raw::{RawIssue, WcagEntry};
use crate::types::WcagLevel;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static TEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"WCAG\s*(\d+\.\d+\.\d+)").unwrap_or_else(|_| panic!("Invalid Regex"))
});
static DOTTED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+\.\d+$").unwrap_or_else(|_| panic!("Invalid Regex")));
// axe criterion tags: wcag111, wcag1410
static AXE_CRITERION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^wcag(\d)(\d)(\d+)$").unwrap_or_else(|_| panic!("Invalid Regex"))
});
// axe conformance tags: wcag2a, wcag21aa, wcag2aaa
static AXE_LEVEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^wcag2\d?(a{1,3})$").unwrap_or_else(|_| panic!("Invalid Regex"))
});
// pa11y sniff codes: WCAG2AA.Principle1.Guideline1_1.1_1_1.H37
static PA11Y_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Guideline\d+_\d+\.(\d+)_(\d+)_(\d+)").unwrap_or_else(|_| panic!("Invalid Regex"))
});

/// What a single raw `wcag` token turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Criterion(String),
    /// An axe conformance tag: not a criterion, but tells the level.
    Level(WcagLevel),
    Empty,
}

/// Criterion ids plus the conformance level the tool implied, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub ids: Vec<String>,
    /// The first `from_field` ids came from the `wcag` list.
    pub from_field: usize,
    /// Highest axe conformance tag in the `wcag` list. Applies only to the
    /// ids from that list.
    pub level_hint: Option<WcagLevel>,
}

impl Extraction {
    /// The level implied for the id at `index`, if any.
    #[must_use]
    pub fn hint_for(&self, index: usize) -> Option<WcagLevel> {
        if index < self.from_field {
            self.level_hint
        } else {
            None
        }
    }
}

/// Returns the deduplicated criterion ids referenced by a raw issue.
#[must_use]
pub fn extract(raw: &RawIssue) -> Vec<String> {
    extract_with_hint(raw).ids
}

/// Like [`extract`], also reporting the highest axe conformance tag seen.
#[must_use]
pub fn extract_with_hint(raw: &RawIssue) -> Extraction {
    let mut out = Extraction::default();
    let mut seen = HashSet::new();
    let mut push = |id: String, ids: &mut Vec<String>| {
        if seen.insert(id.clone()) {
            ids.push(id);
        }
    };

    for entry in &raw.wcag {
        let token = match entry {
            WcagEntry::Id(id) => classify(id),
            WcagEntry::Structured(r) => classify(&r.id),
        };
        match token {
            Token::Criterion(id) => push(id, &mut out.ids),
            Token::Level(level) => {
                out.level_hint = Some(out.level_hint.map_or(level, |l| l.max(level)));
            }
            Token::Empty => {}
        }
    }
    out.from_field = out.ids.len();

    let texts = [raw.message.as_deref(), raw.description.as_deref(), raw.code.as_deref()];
    for text in texts.into_iter().flatten() {
        for id in scan_text(text) {
            push(id, &mut out.ids);
        }
    }
    if let Some(code) = raw.code.as_deref() {
        for id in scan_pa11y_code(code) {
            push(id, &mut out.ids);
        }
    }

    out
}

/// Canonicalizes one token from a `wcag` list. Anything that is neither a
/// criterion nor a conformance tag is [`Token::Empty`].
#[must_use]
pub fn classify(raw: &str) -> Token {
    let token = raw.trim();
    if token.is_empty() {
        return Token::Empty;
    }
    if let Some(caps) = AXE_LEVEL_RE.captures(token) {
        if let Some(level) = caps.get(1).and_then(|m| WcagLevel::parse(m.as_str())) {
            return Token::Level(level);
        }
    }
    if let Some(caps) = AXE_CRITERION_RE.captures(token) {
        return Token::Criterion(format!("{}.{}.{}", &caps[1], &caps[2], &caps[3]));
    }
    let id = canonical_id(token);
    if DOTTED_RE.is_match(&id) {
        Token::Criterion(id)
    } else {
        Token::Empty
    }
}

/// Strips a leading `WCAG` marker from a dotted id. Unrecognized ids are
/// returned trimmed but otherwise as-is.
#[must_use]
pub fn canonical_id(raw: &str) -> String {
    let token = raw.trim();
    let stripped = token
        .get(..4)
        .filter(|prefix| prefix.eq_ignore_ascii_case("wcag"))
        .map_or(token, |_| token[4..].trim_start());
    if DOTTED_RE.is_match(stripped) {
        stripped.to_string()
    } else {
        token.to_string()
    }
}

/// All `WCAG x.y.z` mentions in free text, in order of appearance.
#[must_use]
pub fn scan_text(text: &str) -> Vec<String> {
    TEXT_RE
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect()
}

fn scan_pa11y_code(code: &str) -> Vec<String> {
    PA11Y_RE
        .captures_iter(code)
        .map(|caps| format!("{}.{}.{}", &caps[1], &caps[2], &caps[3]))
        .collect()
}

/// Human name of a WCAG principle digit.
#[must_use]
pub fn principle_name(principle: &str) -> Option<&'static str> {
    match principle {
        "1" => Some("Perceivable"),
        "2" => Some("Operable"),
        "3" => Some("Understandable"),
        "4" => Some("Robust"),
        _ => None,
    }
}
