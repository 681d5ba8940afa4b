use super::super::catalog::DimensionId::{self, D1, D2, D3, D4, D5, D6, D7, D8};
use super::super::scoring::ScoreSheet;
use super::label::ProfileLabel;

/// Threshold test over raw 0-40 totals. Bounds are inclusive.
#[derive(Debug, Clone, Copy)]
pub enum Condition {
    AtLeast(DimensionId, u8),
    AtMost(DimensionId, u8),
    All(&'static [Condition]),
    Any(&'static [Condition]),
}

impl Condition {
    pub fn holds(&self, sheet: &ScoreSheet) -> bool {
        match self {
            Condition::AtLeast(dimension, threshold) => sheet.score(*dimension) >= *threshold,
            Condition::AtMost(dimension, threshold) => sheet.score(*dimension) <= *threshold,
            Condition::All(conditions) => conditions.iter().all(|c| c.holds(sheet)),
            Condition::Any(conditions) => conditions.iter().any(|c| c.holds(sheet)),
        }
    }

    /// Human-readable criterion, e.g. `D7 ≥ 24 ET (D1 ≥ 28 OU D6 ≥ 28)`.
    pub fn describe(&self) -> String {
        match self {
            Condition::AtLeast(dimension, threshold) => format!("{dimension} ≥ {threshold}"),
            Condition::AtMost(dimension, threshold) => format!("{dimension} ≤ {threshold}"),
            Condition::All(conditions) => join(conditions, " ET "),
            Condition::Any(conditions) => join(conditions, " OU "),
        }
    }
}

fn join(conditions: &[Condition], separator: &str) -> String {
    conditions
        .iter()
        .map(|condition| match condition {
            Condition::All(_) | Condition::Any(_) => format!("({})", condition.describe()),
            _ => condition.describe(),
        })
        .collect::<Vec<_>>()
        .join(separator)
}

/// A label and the condition under which it is suggested.
#[derive(Debug)]
pub struct ProfileRule {
    pub label: ProfileLabel,
    pub condition: Condition,
}

/// Clinical thresholds, evaluated in this order. Every rule that holds
/// contributes its label.
pub static PROFILE_RULES: [ProfileRule; 5] = [
    ProfileRule {
        label: ProfileLabel::Hpi,
        condition: Condition::All(&[
            Condition::AtLeast(D1, 20),
            Condition::AtLeast(D6, 28),
            Condition::AtLeast(D5, 24),
            Condition::AtLeast(D4, 20),
        ]),
    },
    ProfileRule {
        label: ProfileLabel::Tdah,
        condition: Condition::AtLeast(D3, 24),
    },
    ProfileRule {
        label: ProfileLabel::Tsa,
        condition: Condition::All(&[Condition::AtLeast(D4, 24), Condition::AtLeast(D2, 24)]),
    },
    ProfileRule {
        label: ProfileLabel::DoubleExceptionality,
        condition: Condition::All(&[
            Condition::AtLeast(D7, 24),
            Condition::Any(&[
                Condition::AtLeast(D1, 28),
                Condition::AtLeast(D6, 28),
                Condition::AtLeast(D5, 28),
            ]),
        ]),
    },
    ProfileRule {
        label: ProfileLabel::Neurotypical,
        condition: Condition::All(&[
            Condition::AtMost(D1, 15),
            Condition::AtMost(D2, 15),
            Condition::AtMost(D3, 15),
            Condition::AtMost(D4, 15),
            Condition::AtMost(D5, 15),
            Condition::AtMost(D6, 15),
            Condition::AtMost(D7, 15),
            Condition::AtMost(D8, 15),
        ]),
    },
];
