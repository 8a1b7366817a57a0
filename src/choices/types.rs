//! Choice encounter definitions.

use crate::effects::EffectTemplate;
use crate::encounters::Rarity;
use crate::stones::Grade;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn name(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Success,
    Partial,
    Failure,
}

/// One concrete change an outcome makes to the cultivator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Consequence {
    Experience(i64),
    /// Negative values damage the foundation.
    Foundation(i32),
    Comprehension(&'static str, u32),
    Elemental(&'static str, u32),
    Stones(Grade, u64),
    /// Added to the success chance of the next breakthrough attempt.
    BreakthroughGuidance(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceOutcome {
    pub kind: OutcomeKind,
    /// Share of the option's probability mass. Outcomes of an option sum to 1.
    pub probability: f64,
    pub message: &'static str,
    pub consequences: &'static [Consequence],
    pub effect: Option<EffectTemplate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceOption {
    pub description: &'static str,
    pub risk: RiskLevel,
    pub outcomes: &'static [ChoiceOutcome],
}

/// An encounter that stops the cultivator and asks how to respond.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceEncounter {
    pub name: &'static str,
    pub description: &'static str,
    pub context: &'static str,
    pub rarity: Rarity,
    pub options: &'static [ChoiceOption],
}

impl ChoiceEncounter {
    /// Index of the first option with the lowest risk.
    pub fn safest_option(&self) -> usize {
        self.options
            .iter()
            .enumerate()
            .min_by_key(|(i, option)| (option.risk, *i))
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    /// Index of the first option with the highest risk.
    pub fn boldest_option(&self) -> usize {
        self.options
            .iter()
            .enumerate()
            .max_by_key(|(i, option)| (option.risk, std::cmp::Reverse(*i)))
            .map(|(i, _)| i)
            .unwrap_or(0)
    }
}
