use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// Stable identifier for a piece, unique for the lifetime of a store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        ItemId(id.into())
    }

    /// Id minted from a store's monotonic counter.
    pub fn from_counter(n: u64) -> Self {
        ItemId(format!("item-{}", n))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        ItemId(id.to_string())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        ItemId(id)
    }
}

/// A placeable piece.
///
/// Which bucket holds the item is not part of the item; it is tracked by
/// [`PlacementState`](crate::PlacementState).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub text: String,
    /// Units of row capacity consumed.
    pub width: NonZeroU32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_ref: Option<String>,
}

impl Item {
    /// Width as a plain integer, for capacity arithmetic.
    pub fn units(&self) -> u32 {
        self.width.get()
    }
}
