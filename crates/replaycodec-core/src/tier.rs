//! Tier spread and tier-position classification.

use serde::{Deserialize, Serialize};

/// The player's tier relative to the tiers present in the battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierPosition {
    OneTier,
    TwoTierBottom,
    TwoTierTop,
    ThreeTierBottom,
    ThreeTierMiddle,
    ThreeTierTop,
    /// Spread of more than three tiers, or a tier outside the spread.
    Undefined,
}

impl TierPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            TierPosition::OneTier => "one_tier",
            TierPosition::TwoTierBottom => "two_tier_bottom",
            TierPosition::TwoTierTop => "two_tier_top",
            TierPosition::ThreeTierBottom => "three_tier_bottom",
            TierPosition::ThreeTierMiddle => "three_tier_middle",
            TierPosition::ThreeTierTop => "three_tier_top",
            TierPosition::Undefined => "undefined",
        }
    }
}

impl std::fmt::Display for TierPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowest and highest distinct tier among a battle's participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierSpread {
    pub min: u8,
    pub max: u8,
}

impl TierSpread {
    /// Spread over the given tiers, or `None` if there are none.
    pub fn from_tiers<I: IntoIterator<Item = u8>>(tiers: I) -> Option<Self> {
        tiers.into_iter().fold(None, |acc, tier| match acc {
            None => Some(Self {
                min: tier,
                max: tier,
            }),
            Some(s) => Some(Self {
                min: s.min.min(tier),
                max: s.max.max(tier),
            }),
        })
    }

    pub fn classify(&self, tier: u8) -> TierPosition {
        classify(tier, self.min, self.max)
    }
}

/// Classify `tier` within `[min_tier, max_tier]`.
///
/// Total: wide spreads and out-of-range tiers map to
/// [`TierPosition::Undefined`].
pub fn classify(tier: u8, min_tier: u8, max_tier: u8) -> TierPosition {
    if tier < min_tier || tier > max_tier {
        return TierPosition::Undefined;
    }
    match max_tier - min_tier {
        0 => TierPosition::OneTier,
        1 if tier == max_tier => TierPosition::TwoTierTop,
        1 => TierPosition::TwoTierBottom,
        2 if tier == max_tier => TierPosition::ThreeTierTop,
        2 if tier == min_tier => TierPosition::ThreeTierBottom,
        2 => TierPosition::ThreeTierMiddle,
        _ => TierPosition::Undefined,
    }
}
