//! Deposits, affordability checks and payment with automatic change-making.

use super::types::{Grade, SpiritStones, StoneBundle};
use crate::core::error::CultivationError;
use tracing::debug;

/// How a cost was settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payment {
    /// Every grade in the cost was covered by stones of that same grade.
    Exact,
    /// The cost was converted to low-grade value and paid from the highest
    /// grades down; `change` went back into the purse.
    Converted { change: StoneBundle },
}

impl SpiritStones {
    /// Deposits stones. Deposit-only: counts are unsigned.
    pub fn add(&mut self, grade: Grade, amount: u64) {
        *self.get_mut(grade) += amount;
    }

    pub fn deposit(&mut self, bundle: &StoneBundle) {
        for (grade, amount) in bundle.iter() {
            self.add(grade, amount);
        }
    }

    /// Wealth in low-grade stone equivalents.
    pub fn total_value(&self) -> u64 {
        Grade::all()
            .into_iter()
            .map(|g| self.get(g) * g.rate())
            .sum()
    }

    fn covers_exactly(&self, cost: &StoneBundle) -> bool {
        cost.iter().all(|(grade, amount)| self.get(grade) >= amount)
    }

    pub fn can_afford(&self, cost: &StoneBundle) -> bool {
        self.covers_exactly(cost) || self.total_value() >= cost.total_value()
    }

    /// Pays `cost`, breaking higher grades when the exact grades are short.
    ///
    /// Never fails when `can_afford` returned true, and never changes total
    /// value by more than the cost.
    pub fn pay(&mut self, cost: &StoneBundle) -> Result<Payment, CultivationError> {
        if self.covers_exactly(cost) {
            for (grade, amount) in cost.iter() {
                *self.get_mut(grade) -= amount;
            }
            return Ok(Payment::Exact);
        }

        let cost_value = cost.total_value();
        let available = self.total_value();
        if available < cost_value {
            return Err(CultivationError::CannotAfford {
                cost: cost.clone(),
                cost_value,
                available,
            });
        }

        let mut paid = 0u64;
        for grade in Grade::all().into_iter().rev() {
            if paid >= cost_value {
                break;
            }
            let held = self.get(grade);
            if held == 0 {
                continue;
            }
            let rate = grade.rate();
            let needed = (cost_value - paid).div_ceil(rate);
            let used = held.min(needed);
            *self.get_mut(grade) -= used;
            paid += used * rate;
        }

        // Overshoot is always smaller than the last grade broken.
        let change = break_into_change(paid - cost_value);
        self.deposit(&change);
        debug!(cost_value, paid, change = change.total_value(), "paid with conversion");
        Ok(Payment::Converted { change })
    }
}

/// Splits a low-grade value into as few stones as possible.
fn break_into_change(mut value: u64) -> StoneBundle {
    let mut change = StoneBundle::new();
    for grade in Grade::all().into_iter().rev() {
        let rate = grade.rate();
        change.add(grade, value / rate);
        value %= rate;
    }
    change
}
