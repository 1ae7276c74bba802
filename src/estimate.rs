//! Heuristic text-to-hours estimation.
//!
//! Rules are evaluated in table order and the first one that matches wins.
//! Matching is case-insensitive; a result of 0 means "unestimated" and is
//! left for the plan generator to fill in.

use regex::Regex;
use std::sync::LazyLock;

use crate::util::round2;

pub const HOURS_PER_PAGE: f64 = 0.2;
pub const HOURS_PER_QUESTION: f64 = 0.1;
pub const CHAPTER_HOURS: f64 = 1.5;
pub const TEST_HOURS: f64 = 2.0;
pub const PRACTICE_HOURS: f64 = 1.0;

static HOURS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)\s*(?:hours|hour|hrs|hr|h)\b").unwrap()
});

static PAGES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)\s*(?:pages|page|pgs)\b").unwrap()
});

static QUESTIONS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)\s*(?:questions|question|ques|qs|q)\b").unwrap()
});

static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").unwrap());

const QUESTION_HINTS: &[&str] = &["question", "ques", "mcq", "qs"];

/// One named estimation rule. `matcher` receives already-lowercased text.
pub struct Rule {
    pub name: &'static str,
    matcher: fn(&str) -> Option<f64>,
}

impl Rule {
    /// Applies this rule alone, without falling through to later rules.
    pub fn apply(&self, text: &str) -> Option<f64> {
        (self.matcher)(&text.to_lowercase())
    }
}

pub static RULES: [Rule; 7] = [
    Rule {
        name: "hours",
        matcher: explicit_hours,
    },
    Rule {
        name: "pages",
        matcher: page_count,
    },
    Rule {
        name: "questions",
        matcher: question_count,
    },
    Rule {
        name: "loose-questions",
        matcher: loose_question_count,
    },
    Rule {
        name: "chapter",
        matcher: chapter,
    },
    Rule {
        name: "test",
        matcher: test_or_mock,
    },
    Rule {
        name: "practice",
        matcher: practice,
    },
];

pub fn estimate(text: &str) -> f64 {
    let lower = text.to_lowercase();
    RULES
        .iter()
        .find_map(|rule| (rule.matcher)(&lower))
        .filter(|hours| hours.is_finite())
        .map(|hours| hours.max(0.0))
        .unwrap_or(0.0)
}

/// Name of the first rule that matches `text`, if any.
pub fn matching_rule(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    RULES
        .iter()
        .find(|rule| (rule.matcher)(&lower).is_some())
        .map(|rule| rule.name)
}

/// Parses a user-entered duration such as `"1.5 h"`, `"2hrs"` or `"3"`.
/// An explicit hour unit wins; otherwise the first number is taken as hours.
pub fn parse_duration(text: &str) -> f64 {
    let lower = text.to_lowercase();
    explicit_hours(&lower)
        .or_else(|| first_number(&lower))
        .filter(|h| h.is_finite())
        .map(|h| h.max(0.0))
        .unwrap_or(0.0)
}

fn capture_number(re: &Regex, text: &str) -> Option<f64> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

fn first_number(text: &str) -> Option<f64> {
    NUMBER_RE
        .find(text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

fn explicit_hours(text: &str) -> Option<f64> {
    capture_number(&HOURS_RE, text)
}

fn page_count(text: &str) -> Option<f64> {
    capture_number(&PAGES_RE, text).map(|pages| round2(pages * HOURS_PER_PAGE))
}

fn question_count(text: &str) -> Option<f64> {
    capture_number(&QUESTIONS_RE, text).map(|qs| round2(qs * HOURS_PER_QUESTION))
}

fn loose_question_count(text: &str) -> Option<f64> {
    if !QUESTION_HINTS.iter().any(|hint| text.contains(hint)) {
        return None;
    }
    first_number(text).map(|n| round2(n * HOURS_PER_QUESTION))
}

fn chapter(text: &str) -> Option<f64> {
    text.contains("chapter").then_some(CHAPTER_HOURS)
}

fn test_or_mock(text: &str) -> Option<f64> {
    (text.contains("test") || text.contains("mock")).then_some(TEST_HOURS)
}

fn practice(text: &str) -> Option<f64> {
    text.contains("practice").then_some(PRACTICE_HOURS)
}
