//! Normalized gestures and how they turn into store operations.
//!
//! The front end reports what the user did (`drag_start`, `drag_end`,
//! `click`, long press, menu choice) in terms of item and bucket ids.
//! [`GestureController`] resolves those ids against the current state and
//! calls into [`PlacementStore`].
//!
//! # Drop resolution
//!
//! A drop names the dragged item and whatever it was released over, which
//! is either another item or a bucket:
//!
//! - nothing under the pointer: no-op;
//! - over an item: the target bucket is that item's bucket;
//! - same row as the source: reorder into the hovered item's slot;
//! - anything else: move to the end of the target bucket.

use std::fmt;
use std::time::{Duration, Instant};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::bucket::BucketId;
use crate::item::ItemId;
use crate::state::PlacementState;
use crate::store::{Outcome, PlacementError, PlacementStore, ReorderTarget};

/// Hold time before a press opens the move menu.
pub const LONG_PRESS_THRESHOLD: Duration = Duration::from_millis(500);

/// The store call a drop turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropAction {
    Move {
        item: ItemId,
        to: BucketId,
    },
    Reorder {
        bucket: BucketId,
        item: ItemId,
        target: ReorderTarget,
    },
}

/// Works out what releasing `active` over `over` should do.
///
/// `over` is an item id or a bucket id. `Ok(None)` means the drop does
/// nothing.
pub fn resolve_drop(
    state: &PlacementState,
    active: &ItemId,
    over: Option<&str>,
) -> Result<Option<DropAction>, PlacementError> {
    let Some(over) = over else {
        return Ok(None);
    };
    let source = state
        .locate(active)
        .ok_or_else(|| PlacementError::NotFound(active.clone()))?
        .bucket;

    let over_item = ItemId::from(over);
    let (target, over_is_item) = match state.locate(&over_item) {
        Some(found) => (found.bucket, true),
        None => {
            let bucket = over
                .parse::<BucketId>()
                .map_err(|_| PlacementError::InvalidBucket(over.to_string()))?;
            (bucket, false)
        }
    };

    if source == target && target.is_row() {
        // Released on the row's empty space rather than on a piece.
        if !over_is_item {
            return Ok(None);
        }
        return Ok(Some(DropAction::Reorder {
            bucket: target,
            item: active.clone(),
            target: ReorderTarget::Item(over_item),
        }));
    }

    Ok(Some(DropAction::Move {
        item: active.clone(),
        to: target,
    }))
}

/// How clicks are interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    /// Drag to move; clicks do nothing.
    #[default]
    Pointer,
    /// A click opens the move menu.
    Touch,
}

impl fmt::Display for InteractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InteractionMode::Pointer => write!(f, "pointer"),
            InteractionMode::Touch => write!(f, "touch"),
        }
    }
}

/// Something the user must be told about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    CapacityShortfall { needed: u32, available: i64 },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::CapacityShortfall { needed, available } => write!(
                f,
                "Not enough space! Need {} units but only {} available.",
                needed, available
            ),
        }
    }
}

/// Explicit move choices for one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveMenu {
    pub item: ItemId,
    pub targets: Vec<BucketId>,
}

/// Cancellable deadline that fires once per press.
#[derive(Debug, Clone)]
pub struct LongPressTimer {
    threshold: Duration,
    armed: Option<(ItemId, Instant)>,
}

impl LongPressTimer {
    pub fn new(threshold: Duration) -> Self {
        LongPressTimer {
            threshold,
            armed: None,
        }
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    pub fn start(&mut self, item: ItemId, now: Instant) {
        self.armed = Some((item, now));
    }

    pub fn cancel(&mut self) {
        self.armed = None;
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Returns the pressed item once the threshold has elapsed, then disarms.
    pub fn poll(&mut self, now: Instant) -> Option<ItemId> {
        let (_, started) = self.armed.as_ref()?;
        if now.saturating_duration_since(*started) < self.threshold {
            return None;
        }
        self.armed.take().map(|(item, _)| item)
    }
}

impl Default for LongPressTimer {
    fn default() -> Self {
        Self::new(LONG_PRESS_THRESHOLD)
    }
}

/// Gesture-side state: the drag in flight, the long-press timer, the open
/// move menu and the last notice for the user.
#[derive(Debug, Clone, Default)]
pub struct GestureController {
    mode: InteractionMode,
    dragging: Option<ItemId>,
    long_press: LongPressTimer,
    menu: Option<MoveMenu>,
    notice: Option<Notice>,
}

impl GestureController {
    pub fn new(mode: InteractionMode, long_press_threshold: Duration) -> Self {
        GestureController {
            mode,
            long_press: LongPressTimer::new(long_press_threshold),
            ..Default::default()
        }
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: InteractionMode) {
        self.mode = mode;
    }

    pub fn dragging(&self) -> Option<&ItemId> {
        self.dragging.as_ref()
    }

    pub fn menu(&self) -> Option<&MoveMenu> {
        self.menu.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    pub fn long_press_armed(&self) -> bool {
        self.long_press.is_armed()
    }

    /// Begins dragging `item`. Ignored when the item does not exist.
    pub fn drag_start(&mut self, store: &PlacementStore, item: &ItemId) {
        self.long_press.cancel();
        if store.locate(item).is_some() {
            self.dragging = Some(item.clone());
        } else {
            warn!("drag start on unknown item {}", item);
        }
    }

    pub fn drag_cancel(&mut self) {
        self.dragging = None;
    }

    /// Finishes a drag of `active` released over `over`.
    pub fn drag_end(
        &mut self,
        store: &mut PlacementStore,
        active: &ItemId,
        over: Option<&str>,
    ) -> Option<Outcome> {
        self.dragging = None;
        let result = match resolve_drop(store.state(), active, over) {
            Ok(None) => return None,
            Ok(Some(DropAction::Move { item, to })) => store.move_item(&item, to),
            Ok(Some(DropAction::Reorder {
                bucket,
                item,
                target,
            })) => store.reorder(bucket, &item, target),
            Err(err) => Err(err),
        };
        self.settle(result)
    }

    /// A click on an item. Opens the move menu in touch mode only.
    pub fn click(&mut self, store: &PlacementStore, item: &ItemId) {
        if self.mode == InteractionMode::Touch {
            self.open_menu(store, item);
        }
    }

    pub fn long_press_start(&mut self, item: ItemId, now: Instant) {
        self.long_press.start(item, now);
    }

    pub fn long_press_end(&mut self) {
        self.long_press.cancel();
    }

    /// Fires a due long press by opening the move menu. Returns whether it fired.
    pub fn poll_long_press(&mut self, store: &PlacementStore, now: Instant) -> bool {
        match self.long_press.poll(now) {
            Some(item) => {
                debug!("long press on {}", item);
                self.open_menu(store, &item);
                self.menu.is_some()
            }
            None => false,
        }
    }

    /// Opens the move menu for an existing item.
    pub fn open_menu(&mut self, store: &PlacementStore, item: &ItemId) {
        if store.locate(item).is_none() {
            warn!("menu requested for unknown item {}", item);
            return;
        }
        self.menu = Some(MoveMenu {
            item: item.clone(),
            targets: store.move_targets(item),
        });
    }

    pub fn close_menu(&mut self) {
        self.menu = None;
    }

    /// Moves `item` straight to `target`, bypassing drag. Closes the menu.
    pub fn menu_select(
        &mut self,
        store: &mut PlacementStore,
        item: &ItemId,
        target: BucketId,
    ) -> Option<Outcome> {
        self.menu = None;
        let result = store.move_item(item, target);
        self.settle(result)
    }

    fn settle(&mut self, result: Result<Outcome, PlacementError>) -> Option<Outcome> {
        match result {
            Ok(outcome) => Some(outcome),
            Err(PlacementError::InsufficientCapacity { needed, available }) => {
                self.notice = Some(Notice::CapacityShortfall { needed, available });
                None
            }
            Err(err) => {
                warn!("gesture ignored: {}", err);
                None
            }
        }
    }
}
