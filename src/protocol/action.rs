//! Action registry.
//!
//! Static list of actions the host understands and the categorical
//! values their payloads may carry. Pure lookups, no state.
//!
//! | Action | Exclusive | Required payload |
//! |--------|-----------|------------------|
//! | `Init` | yes | - |
//! | `ShowAd` | no | `adType` |
//! | `CheckAdAvailability` | no | `adType` |
//! | `Purchase` | yes | `productId` |
//! | `CheckProduct` | no | `productId` |
//! | `RestorePurchases` | yes | - |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ============================================================================
// Action
// ============================================================================

/// A recognized host action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Initialize the host SDKs.
    Init,
    /// Display an ad.
    ShowAd,
    /// Ask whether an ad of a given kind is loaded.
    CheckAdAvailability,
    /// Start an in-app purchase.
    Purchase,
    /// Look up a product.
    CheckProduct,
    /// Restore previous purchases.
    RestorePurchases,
}

impl Action {
    /// Every registered action.
    pub const ALL: [Action; 6] = [
        Action::Init,
        Action::ShowAd,
        Action::CheckAdAvailability,
        Action::Purchase,
        Action::CheckProduct,
        Action::RestorePurchases,
    ];

    /// Returns the wire name of the action.
    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "Init",
            Self::ShowAd => "ShowAd",
            Self::CheckAdAvailability => "CheckAdAvailability",
            Self::Purchase => "Purchase",
            Self::CheckProduct => "CheckProduct",
            Self::RestorePurchases => "RestorePurchases",
        }
    }

    /// Looks up an action by its wire name (case-sensitive).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.as_str() == name)
    }

    /// Returns `true` if `name` is a registered action.
    #[inline]
    #[must_use]
    pub fn is_known(name: &str) -> bool {
        Self::from_name(name).is_some()
    }

    /// Returns `true` if only one instance may be queued or in flight.
    #[inline]
    #[must_use]
    pub const fn is_exclusive(&self) -> bool {
        matches!(self, Self::Init | Self::Purchase | Self::RestorePurchases)
    }

    /// Returns `true` if the action is admitted through the ad rate limiter.
    #[inline]
    #[must_use]
    pub const fn is_rate_limited(&self) -> bool {
        matches!(self, Self::ShowAd)
    }

    /// Returns the categorical payload field this action requires, if any.
    #[inline]
    #[must_use]
    pub const fn category(&self) -> Option<Category> {
        match self {
            Self::ShowAd | Self::CheckAdAvailability => Some(Category::AdType),
            _ => None,
        }
    }

    /// Returns `true` if the payload must carry a `productId`.
    #[inline]
    #[must_use]
    pub const fn requires_product(&self) -> bool {
        matches!(self, Self::Purchase | Self::CheckProduct)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for Action {
    #[inline]
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for Action {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| crate::error::Error::invalid_action(s))
    }
}

// ============================================================================
// Category
// ============================================================================

/// A categorical payload field with a fixed allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// The `adType` field.
    AdType,
}

impl Category {
    /// Returns the payload field name.
    #[inline]
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::AdType => "adType",
        }
    }

    /// Returns `true` if `value` is in this category's allow-list.
    ///
    /// Comparison is case-insensitive.
    #[must_use]
    pub fn is_valid_value(&self, value: &str) -> bool {
        match self {
            Self::AdType => AdType::parse(value).is_some(),
        }
    }
}

// ============================================================================
// AdType
// ============================================================================

/// Kind of ad unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdType {
    /// Full-screen ad between screens.
    Interstitial,
    /// Full-screen ad granting a reward.
    Rewarded,
    /// Inline banner.
    Banner,
}

impl AdType {
    /// Parses an ad type, ignoring ASCII case.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        [Self::Interstitial, Self::Rewarded, Self::Banner]
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value))
    }

    /// Returns the canonical lowercase name.
    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Interstitial => "interstitial",
            Self::Rewarded => "rewarded",
            Self::Banner => "banner",
        }
    }
}

impl fmt::Display for AdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Tests
// ============================================================================
