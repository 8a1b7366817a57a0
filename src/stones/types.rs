use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Spirit stone denominations, ordered from lowest to highest value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    Low,
    Mid,
    High,
    Peak,
    Divine,
}

impl Grade {
    /// All grades, lowest first.
    pub fn all() -> [Grade; 5] {
        [
            Grade::Low,
            Grade::Mid,
            Grade::High,
            Grade::Peak,
            Grade::Divine,
        ]
    }

    /// Value of one stone of this grade in low-grade stones.
    pub fn rate(self) -> u64 {
        match self {
            Grade::Low => 1,
            Grade::Mid => 10,
            Grade::High => 100,
            Grade::Peak => 1_000,
            Grade::Divine => 10_000,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Grade::Low => "Low-Grade",
            Grade::Mid => "Mid-Grade",
            Grade::High => "High-Grade",
            Grade::Peak => "Peak-Grade",
            Grade::Divine => "Divine-Grade",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Grade::Low => "🔸",
            Grade::Mid => "🔹",
            Grade::High => "🔶",
            Grade::Peak => "🔷",
            Grade::Divine => "🔴",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A partial grade -> count mapping, used for costs and rewards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoneBundle(BTreeMap<Grade, u64>);

impl StoneBundle {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn from_pairs(pairs: &[(Grade, u64)]) -> Self {
        let mut bundle = Self::new();
        for &(grade, amount) in pairs {
            bundle.add(grade, amount);
        }
        bundle
    }

    /// Adds stones of a grade. Zero amounts are not recorded.
    pub fn add(&mut self, grade: Grade, amount: u64) {
        if amount > 0 {
            *self.0.entry(grade).or_insert(0) += amount;
        }
    }

    pub fn get(&self, grade: Grade) -> u64 {
        self.0.get(&grade).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(|&n| n == 0)
    }

    /// Iterates grades lowest first.
    pub fn iter(&self) -> impl Iterator<Item = (Grade, u64)> + '_ {
        self.0.iter().map(|(&g, &n)| (g, n))
    }

    /// Total stone count regardless of grade.
    pub fn count(&self) -> u64 {
        self.0.values().sum()
    }

    /// Value in low-grade stones.
    pub fn total_value(&self) -> u64 {
        self.iter().map(|(g, n)| n * g.rate()).sum()
    }
}

impl fmt::Display for StoneBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("No spirit stones");
        }
        let parts: Vec<String> = self
            .iter()
            .filter(|(_, n)| *n > 0)
            .map(|(g, n)| format!("{} {}", g.symbol(), n))
            .collect();
        f.write_str(&parts.join(" + "))
    }
}

/// The player's spirit stone inventory.
///
/// Counts are unsigned, so a deposit can never be negative and a balance can
/// never drop below zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpiritStones {
    pub low: u64,
    pub mid: u64,
    pub high: u64,
    pub peak: u64,
    pub divine: u64,
}

impl SpiritStones {
    /// Empty purse.
    pub fn new() -> Self {
        Self::default()
    }

    /// The purse a freshly created cultivator starts with.
    pub fn starting_purse() -> Self {
        Self {
            low: 50,
            mid: 15,
            high: 3,
            ..Self::default()
        }
    }

    pub fn get(&self, grade: Grade) -> u64 {
        match grade {
            Grade::Low => self.low,
            Grade::Mid => self.mid,
            Grade::High => self.high,
            Grade::Peak => self.peak,
            Grade::Divine => self.divine,
        }
    }

    pub(crate) fn get_mut(&mut self, grade: Grade) -> &mut u64 {
        match grade {
            Grade::Low => &mut self.low,
            Grade::Mid => &mut self.mid,
            Grade::High => &mut self.high,
            Grade::Peak => &mut self.peak,
            Grade::Divine => &mut self.divine,
        }
    }
}

impl fmt::Display for SpiritStones {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = Grade::all()
            .into_iter()
            .filter(|&g| self.get(g) > 0)
            .map(|g| format!("{} {}", g.symbol(), self.get(g)))
            .collect();
        if parts.is_empty() {
            f.write_str("No spirit stones")
        } else {
            f.write_str(&parts.join(" | "))
        }
    }
}
