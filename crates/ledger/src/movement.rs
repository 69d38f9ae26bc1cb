use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{MovementId, ProductId, UserId};

/// Direction of a stock movement.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    In,
    Out,
}

impl MovementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::In => "in",
            MovementKind::Out => "out",
        }
    }
}

impl core::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovementKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in" => Ok(MovementKind::In),
            "out" => Ok(MovementKind::Out),
            other => Err(UnknownVariant {
                value: other.to_string(),
                expected: "one of: in, out",
            }),
        }
    }
}

/// Why stock was adjusted.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementReason {
    Received,
    Sold,
    Damaged,
    #[default]
    Adjustment,
}

impl MovementReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementReason::Received => "received",
            MovementReason::Sold => "sold",
            MovementReason::Damaged => "damaged",
            MovementReason::Adjustment => "adjustment",
        }
    }
}

impl core::fmt::Display for MovementReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovementReason {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "received" => Ok(MovementReason::Received),
            "sold" => Ok(MovementReason::Sold),
            "damaged" => Ok(MovementReason::Damaged),
            "adjustment" => Ok(MovementReason::Adjustment),
            other => Err(UnknownVariant {
                value: other.to_string(),
                expected: "one of: received, sold, damaged, adjustment",
            }),
        }
    }
}

/// Parse failure for a closed enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub value: String,
    pub expected: &'static str,
}

impl core::fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "'{}' is not {}", self.value, self.expected)
    }
}

impl std::error::Error for UnknownVariant {}

/// One ledger entry: an applied change to a product's stock level.
///
/// Movements are append-only. They are never updated or deleted by the
/// application; together with a product's initial quantity they determine
/// its current stock level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockMovement {
    pub id: MovementId,
    pub product_id: ProductId,
    /// The authenticated user who performed the adjustment.
    pub user_id: UserId,
    pub kind: MovementKind,
    /// Always positive; direction is carried by `kind`.
    pub quantity: i64,
    pub reason: MovementReason,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_round_trip_through_strings() {
        for kind in [MovementKind::In, MovementKind::Out] {
            assert_eq!(kind.as_str().parse::<MovementKind>(), Ok(kind));
        }
    }

    #[test]
    fn reasons_round_trip_through_strings() {
        for reason in [
            MovementReason::Received,
            MovementReason::Sold,
            MovementReason::Damaged,
            MovementReason::Adjustment,
        ] {
            assert_eq!(reason.as_str().parse::<MovementReason>(), Ok(reason));
        }
    }

    #[test]
    fn default_reason_is_adjustment() {
        assert_eq!(MovementReason::default(), MovementReason::Adjustment);
    }

    #[test]
    fn unknown_variants_are_rejected() {
        assert!("sideways".parse::<MovementKind>().is_err());
        assert!("stolen".parse::<MovementReason>().is_err());
    }
}
