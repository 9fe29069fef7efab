//! Plan codes and the static pricing table
//!
//! Prices and referral payouts are protocol constants expressed in whole
//! naira (the primary currency's minor unit carries no fractional part).
//! The table is total over [`PlanCode`] by exhaustive `match`, so every
//! recognized plan has exactly one entry and an unpriced plan is
//! unrepresentable after validation.

/// A subscription tier purchased by the buyer.
///
/// Wire values are the raw codes submitted by the client form:
/// `"7"`, `"14"`, and `"forever"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlanCode {
    /// 7-day access ("7")
    Short,
    /// 14-day access ("14")
    Medium,
    /// Lifetime access ("forever")
    Unlimited,
}

/// Base price and referral payout for one plan, in naira.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlanPricing {
    /// What the buyer pays
    pub base_price_minor: u64,
    /// What the promo owner earns when their id is used
    pub referral_payout_minor: u64,
}

impl PlanCode {
    /// All recognized plan codes.
    pub const ALL: [Self; 3] = [Self::Short, Self::Medium, Self::Unlimited];

    /// Parse a wire plan code.
    ///
    /// # Examples
    /// ```
    /// use payrelay_sdk::plan::PlanCode;
    ///
    /// assert_eq!(PlanCode::from_wire("7"), Some(PlanCode::Short));
    /// assert_eq!(PlanCode::from_wire("forever"), Some(PlanCode::Unlimited));
    /// assert_eq!(PlanCode::from_wire("30"), None);
    /// ```
    #[must_use]
    pub fn from_wire(code: &str) -> Option<Self> {
        match code {
            "7" => Some(Self::Short),
            "14" => Some(Self::Medium),
            "forever" => Some(Self::Unlimited),
            _ => None,
        }
    }

    /// The raw code as submitted by the client form.
    #[must_use]
    pub const fn wire(self) -> &'static str {
        match self {
            Self::Short => "7",
            Self::Medium => "14",
            Self::Unlimited => "forever",
        }
    }

    /// Human-readable label used in every notification body.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Short => "7 days plan",
            Self::Medium => "14 days plan",
            Self::Unlimited => "Forever plan",
        }
    }

    /// Price and referral payout for this plan.
    #[must_use]
    pub const fn pricing(self) -> PlanPricing {
        match self {
            Self::Short => PlanPricing {
                base_price_minor: 3_500,
                referral_payout_minor: 1_000,
            },
            Self::Medium => PlanPricing {
                base_price_minor: 7_000,
                referral_payout_minor: 2_000,
            },
            Self::Unlimited => PlanPricing {
                base_price_minor: 20_000,
                referral_payout_minor: 5_000,
            },
        }
    }
}
