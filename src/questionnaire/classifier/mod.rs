mod label;
mod rules;

pub use label::ProfileLabel;
pub use rules::{Condition, ProfileRule, PROFILE_RULES};

use super::scoring::ScoreSheet;
use serde::Serialize;

/// One suggested label and the criterion that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileFinding {
    pub label: ProfileLabel,
    /// `None` for the fallback label, which no threshold produces.
    pub criterion: Option<String>,
}

/// Ordered, never-empty outcome of the threshold rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProfileClassification {
    findings: Vec<ProfileFinding>,
}

impl ProfileClassification {
    pub fn labels(&self) -> Vec<ProfileLabel> {
        self.findings.iter().map(|finding| finding.label).collect()
    }

    pub fn findings(&self) -> &[ProfileFinding] {
        &self.findings
    }

    pub fn contains(&self, label: ProfileLabel) -> bool {
        self.findings.iter().any(|finding| finding.label == label)
    }

    /// True when no rule matched and the nuanced fallback was returned.
    pub fn is_fallback(&self) -> bool {
        matches!(self.findings.as_slice(), [only] if only.label == ProfileLabel::Nuanced)
    }
}

/// Evaluates the profile rules in declaration order against the totals.
pub fn classify(sheet: &ScoreSheet) -> ProfileClassification {
    let mut findings: Vec<ProfileFinding> = PROFILE_RULES
        .iter()
        .filter(|rule| rule.condition.holds(sheet))
        .map(|rule| ProfileFinding {
            label: rule.label,
            criterion: Some(rule.condition.describe()),
        })
        .collect();

    if findings.is_empty() {
        findings.push(ProfileFinding {
            label: ProfileLabel::Nuanced,
            criterion: None,
        });
    }

    ProfileClassification { findings }
}
