use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Polarity {
    Positive,
    #[default]
    Negative,
}

/// How long an effect has left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EffectDuration {
    /// Counts down once per cultivation session.
    Sessions(u32),
    /// Stays until meditation, a cure, or natural recovery removes it.
    #[default]
    UntilCured,
}

/// An active modifier on cultivation experience.
///
/// Names are not unique: applying the same effect twice keeps two entries,
/// and both multipliers apply. Fields missing from a save fall back to a
/// neutral, permanent negative effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OngoingEffect {
    pub name: String,
    pub polarity: Polarity,
    pub description: String,
    pub exp_multiplier: f64,
    pub remaining: EffectDuration,
}

impl Default for OngoingEffect {
    fn default() -> Self {
        Self {
            name: String::new(),
            polarity: Polarity::Negative,
            description: String::new(),
            exp_multiplier: 1.0,
            remaining: EffectDuration::UntilCured,
        }
    }
}

impl OngoingEffect {
    pub fn is_negative(&self) -> bool {
        self.polarity == Polarity::Negative
    }

    pub fn is_permanent(&self) -> bool {
        self.remaining == EffectDuration::UntilCured
    }
}

/// Static blueprint for an effect granted by an encounter.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectTemplate {
    pub name: &'static str,
    pub polarity: Polarity,
    pub description: &'static str,
    pub exp_multiplier: f64,
    /// `None` means permanent until cured.
    pub duration: Option<u32>,
}

impl EffectTemplate {
    pub fn instantiate(&self) -> OngoingEffect {
        OngoingEffect {
            name: self.name.to_string(),
            polarity: self.polarity,
            description: self.description.to_string(),
            exp_multiplier: self.exp_multiplier,
            remaining: match self.duration {
                Some(sessions) => EffectDuration::Sessions(sessions),
                None => EffectDuration::UntilCured,
            },
        }
    }
}
