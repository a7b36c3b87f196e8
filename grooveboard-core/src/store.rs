use log::{debug, info};

use crate::board::BoardSize;
use crate::bucket::BucketId;
use crate::item::{Item, ItemId};
use crate::state::PlacementState;
use crate::template::ItemTemplate;

/// Why a mutation was refused. The state is untouched in every case.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    #[error("item not found: {0}")]
    NotFound(ItemId),
    #[error("Not enough space! Need {needed} units but only {available} available.")]
    InsufficientCapacity { needed: u32, available: i64 },
    #[error("invalid bucket: {0}")]
    InvalidBucket(String),
}

/// What an accepted mutation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Moved {
        item: ItemId,
        from: BucketId,
        to: BucketId,
    },
    Reordered {
        bucket: BucketId,
        from: usize,
        to: usize,
    },
    Unchanged,
}

/// Destination slot for [`PlacementStore::reorder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderTarget {
    /// Take the slot the referenced item occupies now.
    Item(ItemId),
    /// Take an absolute slot, clamped to the last one.
    Index(usize),
}

/// Owner of the [`PlacementState`].
///
/// Every mutation validates first and only then touches the buckets, so a
/// refused call leaves the state exactly as it was. Mutations need
/// `&mut self`, which serializes them.
#[derive(Debug, Clone)]
pub struct PlacementStore {
    state: PlacementState,
    next_id: u64,
}

impl PlacementStore {
    /// Empty store on the given board. Ids start at `item-1`.
    pub fn new(board: BoardSize) -> Self {
        PlacementStore {
            state: PlacementState::new(board),
            next_id: 1,
        }
    }

    /// Store whose available pool is seeded from `templates`, in order.
    pub fn seeded<'a>(
        board: BoardSize,
        templates: impl IntoIterator<Item = &'a ItemTemplate>,
    ) -> Self {
        let mut store = Self::new(board);
        for template in templates {
            store.create_item(template);
        }
        store
    }

    /// Read-only snapshot for rendering.
    pub fn state(&self) -> &PlacementState {
        &self.state
    }

    pub fn locate(&self, id: &ItemId) -> Option<(BucketId, &Item)> {
        self.state
            .locate(id)
            .map(|found| (found.bucket, found.item))
    }

    pub fn used_width(&self, bucket: BucketId) -> u64 {
        self.state.used_width(bucket)
    }

    pub fn remaining(&self, bucket: BucketId) -> Option<i64> {
        self.state.remaining(bucket)
    }

    pub fn capacity_fits(&self, bucket: BucketId, width: u32) -> bool {
        self.state.capacity_fits(bucket, width)
    }

    /// Buckets an item could be moved to right now, in lookup order.
    ///
    /// Excludes the item's own bucket and rows too full to take it.
    /// Empty when the item does not exist.
    pub fn move_targets(&self, id: &ItemId) -> Vec<BucketId> {
        let Some(found) = self.state.locate(id) else {
            return Vec::new();
        };
        BucketId::ALL
            .into_iter()
            .filter(|bucket| *bucket != found.bucket)
            .filter(|bucket| self.state.capacity_fits(*bucket, found.item.units()))
            .collect()
    }

    /// Transfers an item to the end of another bucket.
    ///
    /// Moving into the bucket the item is already in is accepted and does
    /// nothing. Row capacity is checked against the target as it is before
    /// the move.
    pub fn move_item(&mut self, id: &ItemId, target: BucketId) -> Result<Outcome, PlacementError> {
        let found = self
            .state
            .locate(id)
            .ok_or_else(|| PlacementError::NotFound(id.clone()))?;
        let (source, index, width) = (found.bucket, found.index, found.item.units());

        if source == target {
            return Ok(Outcome::Unchanged);
        }

        if let Some(available) = self.state.remaining(target) {
            if i64::from(width) > available {
                debug!("rejected {} -> {}: needs {}, {} left", id, target, width, available);
                return Err(PlacementError::InsufficientCapacity {
                    needed: width,
                    available,
                });
            }
        }

        let item = self.state.bucket_mut(source).remove(index);
        self.state.bucket_mut(target).push(item);
        self.debug_check();

        debug!("moved {} from {} to {}", id, source, target);
        Ok(Outcome::Moved {
            item: id.clone(),
            from: source,
            to: target,
        })
    }

    /// Repositions an item inside its own row.
    ///
    /// The item is removed from its slot and reinserted at the target slot,
    /// shifting the items in between by one. Width is unchanged, so capacity
    /// is not checked.
    pub fn reorder(
        &mut self,
        bucket: BucketId,
        id: &ItemId,
        target: ReorderTarget,
    ) -> Result<Outcome, PlacementError> {
        if !bucket.is_row() {
            return Err(PlacementError::InvalidBucket(bucket.to_string()));
        }

        let items = self.state.items(bucket);
        let from = index_of(items, id).ok_or_else(|| PlacementError::NotFound(id.clone()))?;
        let to = match target {
            ReorderTarget::Item(ref reference) => index_of(items, reference)
                .ok_or_else(|| PlacementError::NotFound(reference.clone()))?,
            ReorderTarget::Index(index) => index.min(items.len() - 1),
        };

        if from == to {
            return Ok(Outcome::Unchanged);
        }

        let items = self.state.bucket_mut(bucket);
        let item = items.remove(from);
        items.insert(to, item);
        self.debug_check();

        debug!("reordered {} in {}: {} -> {}", id, bucket, from, to);
        Ok(Outcome::Reordered { bucket, from, to })
    }

    /// Instantiates a template into the available pool and returns the new id.
    pub fn create_item(&mut self, template: &ItemTemplate) -> ItemId {
        let id = self.mint_id();
        let item = Item {
            id: id.clone(),
            text: template.text.clone(),
            width: template.width,
            visual_ref: template.visual_ref.clone(),
        };
        self.state.bucket_mut(BucketId::Available).push(item);
        self.debug_check();

        debug!("created {} ({}, width {})", id, template.text, template.width);
        id
    }

    /// Removes an item from whichever bucket holds it.
    ///
    /// Returns `None` when the item is already gone.
    pub fn delete_item(&mut self, id: &ItemId) -> Option<Item> {
        let found = self.state.locate(id)?;
        let (bucket, index) = (found.bucket, found.index);
        let item = self.state.bucket_mut(bucket).remove(index);

        debug!("deleted {} from {}", id, bucket);
        Some(item)
    }

    /// Switches the board. Rows already over the new capacity are kept as they are.
    pub fn set_active_board(&mut self, board: BoardSize) {
        info!(
            "board changed: {} ({}) -> {} ({})",
            self.state.active_board().name,
            self.state.active_board().capacity,
            board.name,
            board.capacity
        );
        self.state.set_active_board(board);
    }

    fn mint_id(&mut self) -> ItemId {
        let id = ItemId::from_counter(self.next_id);
        self.next_id += 1;
        id
    }

    fn debug_check(&self) {
        debug_assert!(
            self.state.check_partition().is_ok(),
            "partition broken: {:?}",
            self.state.check_partition()
        );
    }
}

fn index_of(items: &[Item], id: &ItemId) -> Option<usize> {
    items.iter().position(|item| &item.id == id)
}
