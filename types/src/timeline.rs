//! Timelines and per-timeline counters.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the four parallel realities the case plays out in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Timeline {
    #[default]
    Alpha,
    Beta,
    Gamma,
    Delta,
}

impl Timeline {
    pub const ALL: [Timeline; 4] = [
        Timeline::Alpha,
        Timeline::Beta,
        Timeline::Gamma,
        Timeline::Delta,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Timeline::Alpha => "alpha",
            Timeline::Beta => "beta",
            Timeline::Gamma => "gamma",
            Timeline::Delta => "delta",
        }
    }

    /// Parse a timeline name. Accepts the Greek letter as well.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "alpha" | "a" | "α" => Some(Timeline::Alpha),
            "beta" | "b" | "β" => Some(Timeline::Beta),
            "gamma" | "g" | "γ" => Some(Timeline::Gamma),
            "delta" | "d" | "δ" => Some(Timeline::Delta),
            _ => None,
        }
    }

    const fn index(self) -> usize {
        match self {
            Timeline::Alpha => 0,
            Timeline::Beta => 1,
            Timeline::Gamma => 2,
            Timeline::Delta => 3,
        }
    }
}

impl fmt::Display for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Story counters, one per timeline.
///
/// Serialized as `{"alpha": n, "beta": n, "gamma": n, "delta": n}`. Missing
/// keys load as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoryProgress {
    #[serde(default)]
    alpha: u32,
    #[serde(default)]
    beta: u32,
    #[serde(default)]
    gamma: u32,
    #[serde(default)]
    delta: u32,
}

impl StoryProgress {
    #[must_use]
    pub fn new(values: [u32; 4]) -> Self {
        let [alpha, beta, gamma, delta] = values;
        Self {
            alpha,
            beta,
            gamma,
            delta,
        }
    }

    #[must_use]
    pub const fn get(&self, timeline: Timeline) -> u32 {
        match timeline {
            Timeline::Alpha => self.alpha,
            Timeline::Beta => self.beta,
            Timeline::Gamma => self.gamma,
            Timeline::Delta => self.delta,
        }
    }

    /// Bump one counter. Counters only ever move forward.
    pub fn increment(&mut self, timeline: Timeline) -> u32 {
        let slot = match timeline {
            Timeline::Alpha => &mut self.alpha,
            Timeline::Beta => &mut self.beta,
            Timeline::Gamma => &mut self.gamma,
            Timeline::Delta => &mut self.delta,
        };
        *slot = slot.saturating_add(1);
        *slot
    }

    pub fn iter(&self) -> impl Iterator<Item = (Timeline, u32)> + '_ {
        Timeline::ALL.into_iter().map(|t| (t, self.get(t)))
    }

    #[must_use]
    pub fn values(&self) -> [u32; 4] {
        let mut out = [0; 4];
        for (timeline, value) in self.iter() {
            out[timeline.index()] = value;
        }
        out
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.iter().map(|(_, v)| v).sum()
    }

    /// Number of timelines with at least one beat played.
    #[must_use]
    pub fn visited(&self) -> usize {
        self.iter().filter(|(_, v)| *v > 0).count()
    }
}
