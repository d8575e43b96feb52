//! Examine domain
//!
//! A candidate's answer is graded against a reference answer split into three difficulty
//! levels. The model's verdict is mapped onto four ordered tiers.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference answer, one section per difficulty level
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceAnswer {
    #[serde(default)]
    pub basic: String,
    #[serde(default)]
    pub intermediate: String,
    #[serde(default)]
    pub advanced: String,
}

/// Payload of a `question_examine` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamineInput {
    /// Question title
    pub title: String,
    /// The candidate's answer
    pub answer: String,
    #[serde(default)]
    pub reference: ReferenceAnswer,
}

impl ExamineInput {
    pub fn new(
        title: impl Into<String>,
        answer: impl Into<String>,
        reference: ReferenceAnswer,
    ) -> Self {
        Self {
            title: title.into(),
            answer: answer.into(),
            reference,
        }
    }

    /// Fill `{title}`, `{answer}`, `{basic}`, `{intermediate}` and `{advanced}` in `template`
    pub fn render(&self, template: &str) -> String {
        template
            .replace("{title}", &self.title)
            .replace("{answer}", &self.answer)
            .replace("{basic}", &self.reference.basic)
            .replace("{intermediate}", &self.reference.intermediate)
            .replace("{advanced}", &self.reference.advanced)
    }
}

/// Examine outcome, ordered by coverage of the reference answer
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ExamineTier {
    /// Not passed, or never examined
    #[default]
    Failed,
    /// Covers the 15K level
    Basic,
    /// Covers the 25K level
    Intermediate,
    /// Covers the 35K level
    Advanced,
}

impl ExamineTier {
    /// The next lower tier; `Failed` stays `Failed`
    pub fn lower(self) -> Self {
        match self {
            Self::Advanced => Self::Intermediate,
            Self::Intermediate => Self::Basic,
            Self::Basic | Self::Failed => Self::Failed,
        }
    }
}

impl fmt::Display for ExamineTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Failed => "failed",
            Self::Basic => "basic",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        };
        f.write_str(label)
    }
}

/// Typed result of one examine request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamineResult {
    pub tier: ExamineTier,
    /// Model output the tier was derived from
    pub raw_result: String,
    pub tokens: i64,
    pub amount: i64,
    pub tid: String,
}

static BASIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)15k|basic").expect("valid basic marker regex"));
static INTERMEDIATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)25k|intermediate").expect("valid intermediate marker regex"));
static ADVANCED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)35k|advanced").expect("valid advanced marker regex"));
static FAILURE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(fail|failed|none|not passed)\b").expect("valid failure marker regex")
});
static HEDGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(partially|almost|not fully|not quite|maybe|borderline)\b")
        .expect("valid hedge regex")
});
/// Negation in the words leading up to a marker
static NEGATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)\b(not|no|never|below|under|without|lacks?|lacking|fails?|cannot)\b",
        r"|n['’]t\b|[不未没无]"
    ))
    .expect("valid negation regex")
});
/// "Advanced: no", "35K：否"
static DENIAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*[:：=\-]\s*(?:(?:no|not|false)\b|[否不未没无])")
        .expect("valid denial regex")
});

/// Words before a marker searched for a negation
const NEGATION_WINDOW: usize = 4;

/// Map the model's verdict onto a tier.
///
/// The first non-empty line is the verdict. When it carries no affirmed marker the whole answer
/// is scanned. A single tier marker without hedging yields that tier; several tiers or any hedge
/// yield one tier below the highest one mentioned. A negated tier ("not advanced",
/// "Advanced: no") is excluded and caps the result below it. No affirmed marker yields `Failed`.
pub fn parse_verdict(raw: &str) -> ExamineTier {
    let verdict = raw.lines().map(str::trim).find(|line| !line.is_empty());

    verdict
        .and_then(classify)
        .or_else(|| classify(raw))
        .unwrap_or(ExamineTier::Failed)
}

fn classify(text: &str) -> Option<ExamineTier> {
    let mut affirmed = Vec::new();
    let mut ceiling = ExamineTier::Advanced;
    for (tier, marker) in [
        (ExamineTier::Basic, &*BASIC),
        (ExamineTier::Intermediate, &*INTERMEDIATE),
        (ExamineTier::Advanced, &*ADVANCED),
    ] {
        let mention = scan(text, marker);
        if mention.affirmed {
            affirmed.push(tier);
        }
        if mention.denied {
            ceiling = ceiling.min(tier.lower());
        }
    }

    let failed = FAILURE.is_match(text);
    let Some(highest) = affirmed.iter().copied().max() else {
        return failed.then_some(ExamineTier::Failed);
    };

    let tier = if affirmed.len() == 1 && !failed && !HEDGE.is_match(text) {
        highest
    } else {
        highest.lower()
    };
    Some(tier.min(ceiling))
}

#[derive(Debug, Default, Clone, Copy)]
struct Mention {
    affirmed: bool,
    denied: bool,
}

fn scan(text: &str, marker: &Regex) -> Mention {
    let mut mention = Mention::default();
    for m in marker.find_iter(text) {
        let (before, after) = (&text[..m.start()], &text[m.end()..]);
        // "basically", "135k"
        if before.chars().next_back().is_some_and(is_word_char)
            || after.chars().next().is_some_and(is_word_char)
        {
            continue;
        }
        if is_negated(before, after) {
            mention.denied = true;
        } else {
            mention.affirmed = true;
        }
    }
    mention
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_negated(before: &str, after: &str) -> bool {
    if DENIAL.is_match(after) {
        return true;
    }

    let clause = before
        .rsplit(['.', ',', ';', '!', '?', '\n', '。', '，', '；', '！', '？'])
        .next()
        .unwrap_or(before);
    let words: Vec<&str> = clause.split_whitespace().collect();
    let window = words[words.len().saturating_sub(NEGATION_WINDOW)..].join(" ");

    !HEDGE.is_match(&window) && NEGATION.is_match(&window)
}
