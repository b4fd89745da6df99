use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};

use crate::{
    config::Requirement,
    models::{Review, ReviewState},
};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// A compiled set of glob patterns.
///
/// `*` and `?` never cross a `/`, while `**` spans any number of directories.
/// Wildcards skip path components starting with `.` unless the pattern
/// spells the dot out, and `{a,b}` expands to alternatives.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    patterns: Vec<Pattern>,
}

impl PatternMatcher {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let mut compiled = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let pattern = pattern.as_ref();
            for expanded in expand_braces(pattern) {
                compiled.push(
                    Pattern::new(&expanded)
                        .with_context(|| format!("Invalid glob pattern '{pattern}'"))?,
                );
            }
        }
        Ok(Self { patterns: compiled })
    }

    /// True if any pattern matches any of the files.
    pub fn matches_any<S: AsRef<str>>(&self, files: &[S]) -> bool {
        files.iter().any(|file| {
            self.patterns.iter().any(|pattern| pattern.matches_with(file.as_ref(), MATCH_OPTIONS))
        })
    }
}

/// Expands `{a,b}` groups, innermost first. A group without a comma is kept
/// literally.
fn expand_braces(pattern: &str) -> Vec<String> {
    let Some(close) = pattern.find('}') else {
        return vec![pattern.to_string()];
    };
    let Some(open) = pattern[..close].rfind('{') else {
        return vec![pattern.to_string()];
    };
    let body = &pattern[open + 1..close];
    if !body.contains(',') {
        return vec![pattern.to_string()];
    }
    let (prefix, suffix) = (&pattern[..open], &pattern[close + 1..]);
    let mut expanded = Vec::new();
    for alternative in body.split(',') {
        for candidate in expand_braces(&format!("{prefix}{alternative}{suffix}")) {
            if !expanded.contains(&candidate) {
                expanded.push(candidate);
            }
        }
    }
    expanded
}

/// True if any of `patterns` matches any of `files`.
pub fn matches<P: AsRef<str>, F: AsRef<str>>(patterns: &[P], files: &[F]) -> Result<bool> {
    Ok(PatternMatcher::new(patterns)?.matches_any(files))
}

/// Counts every `APPROVED` review entry.
///
/// Entries are not deduplicated by author, and an approval is still counted
/// when the same reviewer later requested changes.
pub fn count_approvals(reviews: &[Review]) -> u32 {
    reviews.iter().filter(|review| review.state == ReviewState::Approved).count() as u32
}

#[derive(Debug, Clone)]
pub struct RequirementResult<'a> {
    pub requirement: &'a Requirement,
    /// At least one changed file matched the requirement's patterns.
    pub triggered: bool,
    pub approvals_present: u32,
    pub approvals_required: u32,
    /// Only meaningful when triggered; untriggered requirements are never
    /// satisfied nor unmet.
    pub satisfied: bool,
}

impl RequirementResult<'_> {
    pub fn is_unmet(&self) -> bool { self.triggered && !self.satisfied }

    /// The log line explaining why this requirement is unmet.
    pub fn unmet_message(&self) -> String {
        format!(
            "Required approvals not met for files matching patterns ({}/{}): {}",
            self.approvals_present,
            self.approvals_required,
            self.requirement.patterns.join(", ")
        )
    }
}

#[derive(Debug, Clone)]
pub struct Evaluation<'a> {
    /// One result per requirement, in configuration order.
    pub results: Vec<RequirementResult<'a>>,
    pub approvals: u32,
    /// Highest `required_approvals` among triggered requirements, at least 1.
    pub max_approvals_required: u32,
}

impl<'a> Evaluation<'a> {
    pub fn is_satisfied(&self) -> bool { !self.results.iter().any(RequirementResult::is_unmet) }

    pub fn unmet(&self) -> impl Iterator<Item = &RequirementResult<'a>> {
        self.results.iter().filter(|result| result.is_unmet())
    }

    pub fn unmet_messages(&self) -> Vec<String> {
        self.unmet().map(RequirementResult::unmet_message).collect()
    }

    /// Check run title, e.g. `1/2 approvals`.
    pub fn approvals_title(&self) -> String {
        format!("{}/{} approvals", self.approvals, self.max_approvals_required)
    }
}

/// Evaluates every requirement against the changed files.
pub fn evaluate<'a, S: AsRef<str>>(
    requirements: &'a [Requirement],
    files: &[S],
    approvals: u32,
) -> Evaluation<'a> {
    let results = requirements
        .iter()
        .map(|requirement| {
            let triggered = requirement.matcher.matches_any(files);
            RequirementResult {
                requirement,
                triggered,
                approvals_present: approvals,
                approvals_required: requirement.required_approvals,
                satisfied: triggered && approvals >= requirement.required_approvals,
            }
        })
        .collect::<Vec<_>>();
    let max_approvals_required = results
        .iter()
        .filter(|result| result.triggered)
        .map(|result| result.approvals_required)
        .max()
        .unwrap_or(0)
        .max(1);
    Evaluation { results, approvals, max_approvals_required }
}
