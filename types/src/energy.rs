//! Bounded game resources.
//!
//! These types keep their values inside `[0, 100]` by construction, so the
//! "energy never negative" and "levels clamped" rules cannot be broken by
//! callers doing arithmetic on raw integers.

use serde::{Deserialize, Deserializer, Serialize};

/// Quantum energy gating timeline switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct QuantumEnergy(u8);

impl QuantumEnergy {
    pub const MAX: u8 = 100;
    /// Energy consumed by a single timeline switch.
    pub const SWITCH_COST: u8 = 20;

    /// Values above [`Self::MAX`] are clamped.
    #[must_use]
    pub fn new(value: u32) -> Self {
        Self(value.min(u32::from(Self::MAX)) as u8)
    }

    #[must_use]
    pub const fn full() -> Self {
        Self(Self::MAX)
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn can_switch(self) -> bool {
        self.0 >= Self::SWITCH_COST
    }

    /// Pay for one switch. Returns the remaining energy, or `None` if there
    /// is not enough left.
    #[must_use]
    pub fn spend_switch(self) -> Option<QuantumEnergy> {
        self.can_switch().then(|| Self(self.0 - Self::SWITCH_COST))
    }

    /// Percentage of the pool already used.
    #[must_use]
    pub const fn spent_percent(self) -> u8 {
        Self::MAX - self.0
    }
}

impl Default for QuantumEnergy {
    fn default() -> Self {
        Self::full()
    }
}

impl<'de> Deserialize<'de> for QuantumEnergy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Negative or oversized values from hand-edited saves are clamped.
        let raw = i64::deserialize(deserializer)?;
        Ok(Self::new(raw.clamp(0, i64::from(Self::MAX)) as u32))
    }
}

/// A percentage-style level clamped to `[0, 100]` (trust, suspicion, stress).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Level(u8);

impl Level {
    pub const MAX: u8 = 100;

    #[must_use]
    pub fn new(value: i32) -> Self {
        Self(value.clamp(0, i32::from(Self::MAX)) as u8)
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Apply a signed delta, saturating at the bounds.
    #[must_use]
    pub fn shifted(self, delta: i32) -> Self {
        Self::new(i32::from(self.0) + delta)
    }
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = f64::deserialize(deserializer)?;
        Ok(Self::new(raw.round().clamp(0.0, f64::from(Self::MAX)) as i32))
    }
}
