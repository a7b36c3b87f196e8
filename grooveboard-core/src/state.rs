use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Serialize;

use crate::board::BoardSize;
use crate::bucket::BucketId;
use crate::item::{Item, ItemId};

/// Raised when an id shows up in more than one place.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PartitionViolation {
    #[error("item {item} appears in both {first} and {second}")]
    DuplicateItem {
        item: ItemId,
        first: BucketId,
        second: BucketId,
    },
}

/// Where [`PlacementState::locate`] found an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Located<'a> {
    pub bucket: BucketId,
    pub index: usize,
    pub item: &'a Item,
}

/// Capacity figures for one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowUsage {
    pub bucket: BucketId,
    pub used: u64,
    pub capacity: u32,
    /// Negative when a smaller board was chosen after the row was filled.
    pub remaining: i64,
}

impl RowUsage {
    pub fn is_over_capacity(&self) -> bool {
        self.remaining < 0
    }
}

/// The partition of every item across the four buckets, plus the active board.
///
/// Derived figures (used and remaining width, fit checks) are computed from
/// the buckets on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacementState {
    active_board: BoardSize,
    buckets: IndexMap<BucketId, Vec<Item>>,
}

impl PlacementState {
    /// Empty buckets on the given board.
    pub fn new(active_board: BoardSize) -> Self {
        let buckets = BucketId::ALL
            .into_iter()
            .map(|bucket| (bucket, Vec::new()))
            .collect();
        PlacementState {
            active_board,
            buckets,
        }
    }

    pub fn active_board(&self) -> &BoardSize {
        &self.active_board
    }

    /// Items in a bucket, in placement order.
    pub fn items(&self, bucket: BucketId) -> &[Item] {
        self.buckets
            .get(&bucket)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All buckets in lookup order.
    pub fn buckets(&self) -> impl Iterator<Item = (BucketId, &[Item])> {
        self.buckets
            .iter()
            .map(|(bucket, items)| (*bucket, items.as_slice()))
    }

    pub fn item_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Finds the bucket holding `id`, scanning `available` then the rows.
    pub fn locate(&self, id: &ItemId) -> Option<Located<'_>> {
        self.buckets.iter().find_map(|(bucket, items)| {
            items
                .iter()
                .position(|item| &item.id == id)
                .map(|index| Located {
                    bucket: *bucket,
                    index,
                    item: &items[index],
                })
        })
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.locate(id).is_some()
    }

    pub fn used_width(&self, bucket: BucketId) -> u64 {
        self.items(bucket)
            .iter()
            .map(|item| u64::from(item.units()))
            .sum()
    }

    /// Width still free in a row; `None` for the unbounded available pool.
    pub fn remaining(&self, bucket: BucketId) -> Option<i64> {
        if !bucket.is_row() {
            return None;
        }
        let used = i64::try_from(self.used_width(bucket)).unwrap_or(i64::MAX);
        Some(i64::from(self.active_board.capacity) - used)
    }

    /// Whether a piece of `width` would fit into `bucket` right now.
    pub fn capacity_fits(&self, bucket: BucketId, width: u32) -> bool {
        match self.remaining(bucket) {
            Some(remaining) => i64::from(width) <= remaining,
            None => true,
        }
    }

    pub fn row_usage(&self) -> Vec<RowUsage> {
        BucketId::ROWS
            .into_iter()
            .map(|bucket| RowUsage {
                bucket,
                used: self.used_width(bucket),
                capacity: self.active_board.capacity,
                remaining: self.remaining(bucket).unwrap_or_default(),
            })
            .collect()
    }

    /// Checks that no id is held twice, in the same or different buckets.
    pub fn check_partition(&self) -> Result<(), PartitionViolation> {
        let mut seen: HashMap<&ItemId, BucketId> = HashMap::new();
        for (bucket, items) in &self.buckets {
            for item in items {
                if let Some(first) = seen.insert(&item.id, *bucket) {
                    return Err(PartitionViolation::DuplicateItem {
                        item: item.id.clone(),
                        first,
                        second: *bucket,
                    });
                }
            }
        }
        Ok(())
    }

    pub(crate) fn bucket_mut(&mut self, bucket: BucketId) -> &mut Vec<Item> {
        self.buckets.entry(bucket).or_default()
    }

    pub(crate) fn set_active_board(&mut self, board: BoardSize) {
        self.active_board = board;
    }
}
