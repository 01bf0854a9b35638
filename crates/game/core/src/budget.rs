//! Restock usage accounting.

/// Remaining restock grants of a dispenser.
///
/// The first unit of a finite capacity pays for the initial stocking, so a
/// capacity of `n` starts at `Remaining(n - 1)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UsageBudget {
    #[default]
    Infinite,
    Remaining(u32),
}

impl UsageBudget {
    /// Budget for a configured capacity; `capacity <= 0` is unlimited.
    pub fn from_capacity(capacity: i64) -> Self {
        if capacity <= 0 {
            return Self::Infinite;
        }
        let granted = u32::try_from(capacity).unwrap_or(u32::MAX);
        Self::Remaining(granted - 1)
    }

    /// No further restock may be granted.
    #[inline]
    pub fn is_exhausted(self) -> bool {
        matches!(self, Self::Remaining(0))
    }

    #[inline]
    pub fn is_infinite(self) -> bool {
        matches!(self, Self::Infinite)
    }

    /// Consumes one grant. Infinite budgets are unaffected.
    pub fn consume(&mut self) {
        if let Self::Remaining(n) = self {
            *n = n.saturating_sub(1);
        }
    }

    pub fn remaining(self) -> Option<u32> {
        match self {
            Self::Infinite => None,
            Self::Remaining(n) => Some(n),
        }
    }
}

impl std::fmt::Display for UsageBudget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Infinite => f.write_str("infinite"),
            Self::Remaining(n) => write!(f, "{n} remaining"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_positive_capacity_is_infinite() {
        assert_eq!(UsageBudget::from_capacity(0), UsageBudget::Infinite);
        assert_eq!(UsageBudget::from_capacity(-4), UsageBudget::Infinite);
    }

    #[test]
    fn first_unit_is_spent_on_initial_stocking() {
        assert_eq!(UsageBudget::from_capacity(1), UsageBudget::Remaining(0));
        assert_eq!(UsageBudget::from_capacity(3), UsageBudget::Remaining(2));
        assert!(UsageBudget::from_capacity(1).is_exhausted());
    }

    #[test]
    fn consume_counts_down_and_saturates() {
        let mut budget = UsageBudget::Remaining(1);
        budget.consume();
        assert_eq!(budget, UsageBudget::Remaining(0));
        budget.consume();
        assert_eq!(budget, UsageBudget::Remaining(0));

        let mut infinite = UsageBudget::Infinite;
        for _ in 0..1000 {
            infinite.consume();
        }
        assert!(infinite.is_infinite());
        assert!(!infinite.is_exhausted());
    }

    #[test]
    fn huge_capacity_is_clamped() {
        assert_eq!(
            UsageBudget::from_capacity(i64::MAX),
            UsageBudget::Remaining(u32::MAX - 1)
        );
    }
}
