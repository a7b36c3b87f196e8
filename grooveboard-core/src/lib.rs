//! Grooveboard is a placement engine for pieces laid into the grooves of a board.
//!
//! Core concepts:
//! - **Item**: a piece with a width, measured in units of row capacity
//! - **Bucket**: the available pool or one of three rows; together they partition all items
//! - **BoardSize**: a preset whose capacity bounds the total width of every row
//! - **PlacementStore**: owns the partition and applies moves, reorders, creation and deletion
//! - **GestureController**: turns drag, click, long-press and menu gestures into store calls
//!
//! # Example
//!
//! ```
//! use grooveboard_core::{BoardCatalog, BucketId, ItemTemplate, PlacementError, PlacementStore};
//!
//! let boards = BoardCatalog::builtin();
//! let mut store = PlacementStore::new(boards.by_key("small").unwrap().clone());
//!
//! let a = store.create_item(&ItemTemplate::new("A", 100).unwrap());
//! store.move_item(&a, BucketId::Row1).unwrap();
//! assert_eq!(store.remaining(BucketId::Row1), Some(124));
//!
//! let b = store.create_item(&ItemTemplate::new("B", 150).unwrap());
//! assert_eq!(
//!     store.move_item(&b, BucketId::Row1),
//!     Err(PlacementError::InsufficientCapacity { needed: 150, available: 124 })
//! );
//! ```
//!
//! # Invariants
//!
//! Every item id is held by exactly one bucket. A row's used width never
//! exceeds the board capacity through a move; only switching to a smaller
//! board can leave a row over capacity, and nothing is evicted when that
//! happens.

mod board;
mod bucket;
pub mod gesture;
mod item;
mod state;
mod store;
mod template;

pub use board::{BoardCatalog, BoardSize, DEFAULT_BOARD_KEY};
pub use bucket::{BucketId, BucketParseError};
pub use gesture::{
    resolve_drop, DropAction, GestureController, InteractionMode, LongPressTimer, MoveMenu,
    Notice, LONG_PRESS_THRESHOLD,
};
pub use item::{Item, ItemId};
pub use state::{Located, PartitionViolation, PlacementState, RowUsage};
pub use store::{Outcome, PlacementError, PlacementStore, ReorderTarget};
pub use template::{starter_templates, ItemTemplate, ItemTemplateCatalog};
