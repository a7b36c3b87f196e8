use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the four containers that together hold every item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BucketId {
    #[serde(rename = "available")]
    Available,
    #[serde(rename = "row-1")]
    Row1,
    #[serde(rename = "row-2")]
    Row2,
    #[serde(rename = "row-3")]
    Row3,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown bucket: {0}")]
pub struct BucketParseError(pub String);

impl BucketId {
    /// Every bucket, in lookup order.
    pub const ALL: [BucketId; 4] = [
        BucketId::Available,
        BucketId::Row1,
        BucketId::Row2,
        BucketId::Row3,
    ];

    /// The capacity-bound buckets, back to front.
    pub const ROWS: [BucketId; 3] = [BucketId::Row1, BucketId::Row2, BucketId::Row3];

    pub fn is_row(self) -> bool {
        !matches!(self, BucketId::Available)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BucketId::Available => "available",
            BucketId::Row1 => "row-1",
            BucketId::Row2 => "row-2",
            BucketId::Row3 => "row-3",
        }
    }

    /// Human-facing heading.
    pub fn title(self) -> &'static str {
        match self {
            BucketId::Available => "Available Items",
            BucketId::Row1 => "Back Row",
            BucketId::Row2 => "Middle Row",
            BucketId::Row3 => "Front Row",
        }
    }
}

impl fmt::Display for BucketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BucketId {
    type Err = BucketParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BucketId::ALL
            .into_iter()
            .find(|bucket| bucket.as_str() == s)
            .ok_or_else(|| BucketParseError(s.to_string()))
    }
}
