use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::policy::PatternMatcher;

#[derive(Debug, Clone)]
pub struct Config {
    pub requirements: Vec<Requirement>,
    pub github: GitHubConfig,
}

#[derive(Debug, Clone)]
pub struct GitHubConfig {
    pub token: String,
    /// REST API base URL, for GitHub Enterprise Server.
    pub api_url: Option<String>,
}

/// A validated requirement: changes to files matching `patterns` need at
/// least `required_approvals` approving reviews.
#[derive(Debug, Clone)]
pub struct Requirement {
    pub patterns: Vec<String>,
    pub required_approvals: u32,
    pub(crate) matcher: PatternMatcher,
}

impl Requirement {
    pub fn new(patterns: Vec<String>, required_approvals: u32) -> Result<Self> {
        if patterns.is_empty() {
            bail!("Requirement must have at least one pattern");
        }
        let matcher = PatternMatcher::new(&patterns)?;
        Ok(Self { patterns, required_approvals, matcher })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRequirement {
    patterns: Vec<String>,
    required_approvals: u32,
}

/// Parses a YAML sequence of `{patterns, requiredApprovals}` mappings.
pub fn parse_requirements(input: &str) -> Result<Vec<Requirement>> {
    let value: serde_yaml::Value =
        serde_yaml::from_str(input).context("Failed to parse requirements YAML")?;
    let serde_yaml::Value::Sequence(entries) = value else {
        bail!("Requirements must be an array");
    };
    entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            if !entry.is_mapping() {
                bail!("Requirement {} must be an object", i + 1);
            }
            let raw: RawRequirement = serde_yaml::from_value(entry)
                .with_context(|| format!("Invalid requirement {}", i + 1))?;
            Requirement::new(raw.patterns, raw.required_approvals)
                .with_context(|| format!("Invalid requirement {}", i + 1))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_requirements() {
        let requirements = parse_requirements(
            r#"
- patterns:
    - "src/**/*"
  requiredApprovals: 1
- patterns: [".github/**/*", "Cargo.toml"]
  requiredApprovals: 2
"#,
        )
        .unwrap();
        assert_eq!(requirements.len(), 2);
        assert_eq!(requirements[0].patterns, vec!["src/**/*"]);
        assert_eq!(requirements[0].required_approvals, 1);
        assert_eq!(requirements[1].patterns, vec![".github/**/*", "Cargo.toml"]);
        assert_eq!(requirements[1].required_approvals, 2);
    }

    #[test]
    fn test_parse_empty_list() {
        assert!(parse_requirements("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_requirements_errors() {
        let cases: &[(&str, &str)] = &[
            ("patterns: [a]\nrequiredApprovals: 1", "Requirements must be an array"),
            ("- 5", "Requirement 1 must be an object"),
            ("- requiredApprovals: 1", "Invalid requirement 1"),
            ("- patterns: a\n  requiredApprovals: 1", "Invalid requirement 1"),
            ("- patterns: [a]", "Invalid requirement 1"),
            ("- patterns: [a]\n  requiredApprovals: -1", "Invalid requirement 1"),
            ("- patterns: [a]\n  requiredApprovals: two", "Invalid requirement 1"),
            ("- patterns: []\n  requiredApprovals: 1", "Invalid requirement 1"),
            (
                "- patterns: [a]\n  requiredApprovals: 1\n\
                 - patterns: ['[oops']\n  requiredApprovals: 1",
                "Invalid requirement 2",
            ),
            ("- [unterminated", "Failed to parse requirements YAML"),
        ];
        for &(input, expected) in cases {
            let err = parse_requirements(input).unwrap_err();
            assert!(
                err.to_string().contains(expected),
                "expected {expected:?} for {input:?}, got {err:#}"
            );
        }
    }

    #[test]
    fn test_error_chain_names_cause() {
        let err = parse_requirements("- patterns: []\n  requiredApprovals: 1").unwrap_err();
        assert!(format!("{err:#}").contains("at least one pattern"));
        let err = parse_requirements("- patterns: ['[oops']\n  requiredApprovals: 1").unwrap_err();
        assert!(format!("{err:#}").contains("[oops"));
    }
}
