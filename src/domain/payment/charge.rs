//! Charge derivation from the locked totals snapshot.
//!
//! The snapshot is the only trusted amount source. Once derived for an
//! attempt, the amount and currency are never recomputed from anything else.

use super::order::TotalsSnapshot;

/// Fallback currency when the snapshot carries none.
pub const DEFAULT_CURRENCY: &str = "usd";

/// Amount and currency to charge, in provider form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Charge {
    /// Amount in integer minor units (cents).
    pub amount_minor: i64,

    /// Lowercase ISO currency code.
    pub currency: String,
}

impl Charge {
    /// Derives the charge from a locked snapshot: `round(total * 100)` minor
    /// units, lowercase currency, defaulting to [`DEFAULT_CURRENCY`].
    pub fn from_snapshot(snapshot: &TotalsSnapshot) -> Self {
        let amount_minor = (snapshot.total * 100.0).round() as i64;
        let currency = snapshot
            .currency
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_lowercase)
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

        Self {
            amount_minor,
            currency,
        }
    }

    /// A chargeable amount must be strictly positive.
    pub fn is_positive(&self) -> bool {
        self.amount_minor > 0
    }
}
