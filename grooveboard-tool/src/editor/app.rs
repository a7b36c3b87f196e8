use std::path::PathBuf;
use std::time::Instant;

use grooveboard_core::{
    starter_templates, BoardCatalog, BucketId, GestureController, InteractionMode, ItemId,
    ItemTemplateCatalog, Outcome, PlacementStore,
};
use ratatui::layout::{Position, Rect};

use crate::config::EditorSettings;
use crate::export::{export_to_dir, ExportFormat};

/// Buckets in on-screen order, top to bottom.
pub const FOCUS_ORDER: [BucketId; 4] = [
    BucketId::Row1,
    BucketId::Row2,
    BucketId::Row3,
    BucketId::Available,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Edit,
    SelectBoard,
    SelectTemplate,
}

/// Keyboard cursor. A slot equal to the bucket length is the free space
/// after the last piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Focus {
    pub bucket: BucketId,
    pub slot: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitTarget {
    Item(ItemId),
    Bucket(BucketId),
    MenuEntry(usize),
}

impl HitTarget {
    /// The drop target string the gesture layer understands.
    pub fn drop_target(&self) -> Option<String> {
        match self {
            HitTarget::Item(id) => Some(id.to_string()),
            HitTarget::Bucket(bucket) => Some(bucket.as_str().to_string()),
            HitTarget::MenuEntry(_) => None,
        }
    }
}

/// Screen regions recorded during the last draw.
#[derive(Debug, Default)]
pub struct HitMap {
    regions: Vec<(Rect, HitTarget)>,
}

impl HitMap {
    pub fn clear(&mut self) {
        self.regions.clear();
    }

    pub fn push(&mut self, area: Rect, target: HitTarget) {
        self.regions.push((area, target));
    }

    /// Topmost region under the point. Later registrations win.
    pub fn at(&self, column: u16, row: u16) -> Option<&HitTarget> {
        let position = Position::new(column, row);
        self.regions
            .iter()
            .rev()
            .find(|(area, _)| area.contains(position))
            .map(|(_, target)| target)
    }
}

/// A mouse press on a piece that has not been released yet.
#[derive(Debug, Clone)]
pub struct Press {
    pub item: ItemId,
    pub dragging: bool,
}

pub struct EditorApp {
    pub mode: AppMode,
    pub should_quit: bool,
    pub store: PlacementStore,
    pub gestures: GestureController,
    pub boards: BoardCatalog,
    pub templates: ItemTemplateCatalog,
    pub focus: Focus,
    pub popup_selected: usize,
    pub menu_selected: usize,
    pub press: Option<Press>,
    pub hits: HitMap,
    /// First pool line drawn; follows the focus.
    pub pool_offset: usize,
    pub export_dir: PathBuf,
    pub status: Option<String>,
    pub last_error: Option<String>,
}

impl EditorApp {
    pub fn new(settings: EditorSettings) -> Self {
        let store = if settings.seed_starter_items {
            PlacementStore::seeded(settings.board, starter_templates().iter())
        } else {
            PlacementStore::new(settings.board)
        };

        Self {
            mode: AppMode::Edit,
            should_quit: false,
            store,
            gestures: GestureController::new(settings.mode, settings.long_press),
            boards: settings.boards,
            templates: settings.templates,
            focus: Focus {
                bucket: BucketId::Available,
                slot: 0,
            },
            popup_selected: 0,
            menu_selected: 0,
            press: None,
            hits: HitMap::default(),
            pool_offset: 0,
            export_dir: PathBuf::from("."),
            status: None,
            last_error: None,
        }
    }

    /// Fires a due long press. Called once per loop turn.
    pub fn tick(&mut self, now: Instant) {
        if self.gestures.poll_long_press(&self.store, now) {
            self.menu_selected = 0;
            self.press = None;
        }
    }

    // Focus

    pub fn focused_item(&self) -> Option<ItemId> {
        self.store
            .state()
            .items(self.focus.bucket)
            .get(self.focus.slot)
            .map(|item| item.id.clone())
    }

    /// Item id under the focus, or the bucket id when the focus is on free space.
    pub fn focus_target(&self) -> String {
        match self.focused_item() {
            Some(id) => id.to_string(),
            None => self.focus.bucket.as_str().to_string(),
        }
    }

    pub fn focus_left(&mut self) {
        self.focus.slot = self.focus.slot.saturating_sub(1);
    }

    pub fn focus_right(&mut self) {
        let len = self.store.state().items(self.focus.bucket).len();
        self.focus.slot = (self.focus.slot + 1).min(len);
    }

    pub fn focus_up(&mut self) {
        self.step_bucket(FOCUS_ORDER.len() - 1);
    }

    pub fn focus_down(&mut self) {
        self.step_bucket(1);
    }

    fn step_bucket(&mut self, step: usize) {
        let current = FOCUS_ORDER
            .iter()
            .position(|bucket| *bucket == self.focus.bucket)
            .unwrap_or(0);
        self.focus.bucket = FOCUS_ORDER[(current + step) % FOCUS_ORDER.len()];
        self.clamp_focus();
    }

    pub fn focus_item(&mut self, id: &ItemId) {
        if let Some(found) = self.store.state().locate(id) {
            self.focus = Focus {
                bucket: found.bucket,
                slot: found.index,
            };
        }
    }

    fn clamp_focus(&mut self) {
        let len = self.store.state().items(self.focus.bucket).len();
        self.focus.slot = self.focus.slot.min(len);
    }

    // Keyboard drag

    /// Picks up the focused piece, or drops the carried one at the focus.
    pub fn pick_or_drop(&mut self) {
        match self.gestures.dragging().cloned() {
            Some(active) => {
                let target = self.focus_target();
                let outcome = self.gestures.drag_end(&mut self.store, &active, Some(&target));
                self.report(outcome);
                self.focus_item(&active);
            }
            None => {
                if let Some(id) = self.focused_item() {
                    self.gestures.drag_start(&self.store, &id);
                    self.status = Some(format!("Carrying {}", id));
                }
            }
        }
    }

    pub fn cancel_drag(&mut self) {
        self.gestures.drag_cancel();
        self.status = None;
    }

    // Move menu

    pub fn open_menu(&mut self) {
        if let Some(id) = self.focused_item() {
            self.gestures.open_menu(&self.store, &id);
            self.menu_selected = 0;
        }
    }

    pub fn menu_up(&mut self) {
        self.menu_selected = self.menu_selected.saturating_sub(1);
    }

    pub fn menu_down(&mut self) {
        let len = self.gestures.menu().map_or(0, |menu| menu.targets.len());
        if self.menu_selected + 1 < len {
            self.menu_selected += 1;
        }
    }

    pub fn menu_choose(&mut self, index: usize) {
        let Some(menu) = self.gestures.menu() else {
            return;
        };
        let Some(target) = menu.targets.get(index).copied() else {
            return;
        };
        let item = menu.item.clone();
        let outcome = self.gestures.menu_select(&mut self.store, &item, target);
        self.report(outcome);
        self.focus_item(&item);
    }

    pub fn close_menu(&mut self) {
        self.gestures.close_menu();
    }

    pub fn dismiss_notice(&mut self) {
        self.gestures.take_notice();
    }

    // Pieces

    pub fn delete_focused(&mut self) {
        if let Some(id) = self.focused_item() {
            if self.gestures.dragging() == Some(&id) {
                self.gestures.drag_cancel();
            }
            if let Some(item) = self.store.delete_item(&id) {
                self.status = Some(format!("Deleted {}", item.text));
            }
            self.clamp_focus();
        }
    }

    pub fn toggle_mode(&mut self) {
        let next = match self.gestures.mode() {
            InteractionMode::Pointer => InteractionMode::Touch,
            InteractionMode::Touch => InteractionMode::Pointer,
        };
        self.gestures.set_mode(next);
        self.status = Some(format!("Mode: {}", next));
    }

    pub fn export_layout(&mut self, format: ExportFormat) {
        match export_to_dir(self.store.state(), format, &self.export_dir) {
            Ok(path) => {
                log::info!("exported layout to {}", path.display());
                self.status = Some(format!("Exported to {}", path.display()));
                self.last_error = None;
            }
            Err(e) => {
                log::warn!("export failed: {}", e);
                self.last_error = Some(format!("Export failed: {}", e));
            }
        }
    }

    // Pickers

    pub fn open_board_picker(&mut self) {
        let active = &self.store.state().active_board().key;
        self.popup_selected = self
            .boards
            .all()
            .iter()
            .position(|board| &board.key == active)
            .unwrap_or(0);
        self.mode = AppMode::SelectBoard;
    }

    pub fn open_template_picker(&mut self) {
        self.popup_selected = 0;
        self.mode = AppMode::SelectTemplate;
    }

    pub fn close_popup(&mut self) {
        self.mode = AppMode::Edit;
    }

    pub fn popup_up(&mut self) {
        self.popup_selected = self.popup_selected.saturating_sub(1);
    }

    pub fn popup_down(&mut self) {
        let len = match self.mode {
            AppMode::SelectBoard => self.boards.len(),
            AppMode::SelectTemplate => self.templates.len(),
            AppMode::Edit => 0,
        };
        if self.popup_selected + 1 < len {
            self.popup_selected += 1;
        }
    }

    pub fn popup_select(&mut self) {
        match self.mode {
            AppMode::SelectBoard => {
                if let Some(board) = self.boards.all().get(self.popup_selected).cloned() {
                    if board.in_stock {
                        self.status = Some(format!("Board: {}", board.label));
                        self.store.set_active_board(board);
                    } else {
                        self.last_error = Some(format!("{} is out of stock", board.label));
                    }
                }
            }
            AppMode::SelectTemplate => {
                if let Some(template) = self.templates.get(self.popup_selected).cloned() {
                    let id = self.store.create_item(&template);
                    self.status = Some(format!("Added {} ({})", template.text, template.width));
                    self.focus_item(&id);
                }
            }
            AppMode::Edit => {}
        }
        self.mode = AppMode::Edit;
    }

    fn report(&mut self, outcome: Option<Outcome>) {
        self.status = match outcome {
            Some(Outcome::Moved { item, to, .. }) => Some(format!("Moved {} to {}", item, to.title())),
            Some(Outcome::Reordered { bucket, .. }) => Some(format!("Reordered {}", bucket.title())),
            Some(Outcome::Unchanged) | None => None,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{resolve_settings, Config, EditOverrides};
    use grooveboard_core::{ItemTemplate, Notice};

    fn app(board: &str, empty: bool) -> EditorApp {
        let overrides = EditOverrides {
            board: Some(board.to_string()),
            touch: false,
            empty,
        };
        let settings = resolve_settings(Config::default(), overrides).unwrap();
        EditorApp::new(settings)
    }

    fn ids(app: &EditorApp, bucket: BucketId) -> Vec<String> {
        app.store
            .state()
            .items(bucket)
            .iter()
            .map(|item| item.id.to_string())
            .collect()
    }

    #[test]
    fn starts_with_starter_pool() {
        let app = app("medium", false);
        assert_eq!(
            ids(&app, BucketId::Available),
            ["item-1", "item-2", "item-3", "item-4", "item-5"]
        );
        assert_eq!(app.focus_target(), "item-1");
    }

    #[test]
    fn keyboard_pick_and_drop_into_row() {
        let mut app = app("medium", false);

        app.pick_or_drop();
        assert_eq!(app.gestures.dragging().map(|id| id.as_str()), Some("item-1"));

        app.focus_up();
        assert_eq!(app.focus.bucket, BucketId::Row3);
        assert_eq!(app.focus_target(), "row-3");

        app.pick_or_drop();
        assert!(app.gestures.dragging().is_none());
        assert_eq!(ids(&app, BucketId::Row3), ["item-1"]);
        assert_eq!(app.focus, Focus { bucket: BucketId::Row3, slot: 0 });
    }

    #[test]
    fn keyboard_drop_onto_piece_reorders() {
        let mut app = app("medium", true);
        for text in ["A", "B", "C"] {
            let id = app.store.create_item(&ItemTemplate::new(text, 10).unwrap());
            app.store.move_item(&id, BucketId::Row1).unwrap();
        }
        app.focus = Focus { bucket: BucketId::Row1, slot: 2 };

        app.pick_or_drop();
        app.focus_left();
        app.focus_left();
        app.pick_or_drop();

        assert_eq!(ids(&app, BucketId::Row1), ["item-3", "item-1", "item-2"]);
        assert_eq!(app.status.as_deref(), Some("Reordered Back Row"));
    }

    #[test]
    fn refused_drop_raises_notice() {
        let mut app = app("small", true);
        let big = app.store.create_item(&ItemTemplate::new("Big", 800).unwrap());
        app.focus_item(&big);

        app.pick_or_drop();
        app.focus_down();
        app.pick_or_drop();

        assert_eq!(
            app.gestures.notice(),
            Some(&Notice::CapacityShortfall { needed: 800, available: 224 })
        );
        assert_eq!(ids(&app, BucketId::Available), ["item-1"]);
        app.dismiss_notice();
        assert!(app.gestures.notice().is_none());
    }

    #[test]
    fn menu_moves_focused_piece() {
        let mut app = app("medium", false);
        app.open_menu();
        assert_eq!(
            app.gestures.menu().unwrap().targets,
            [BucketId::Row1, BucketId::Row2, BucketId::Row3]
        );

        app.menu_down();
        app.menu_choose(app.menu_selected);

        assert!(app.gestures.menu().is_none());
        assert_eq!(ids(&app, BucketId::Row2), ["item-1"]);
    }

    #[test]
    fn template_picker_creates_piece() {
        let mut app = app("medium", false);
        app.open_template_picker();
        app.popup_down();
        app.popup_select();

        assert_eq!(app.mode, AppMode::Edit);
        assert_eq!(ids(&app, BucketId::Available).last().unwrap(), "item-6");
        assert_eq!(app.focus, Focus { bucket: BucketId::Available, slot: 5 });
    }

    #[test]
    fn board_picker_starts_on_active_board() {
        let mut app = app("large", false);
        app.open_board_picker();
        assert_eq!(app.popup_selected, 2);

        app.popup_up();
        app.popup_select();
        assert_eq!(app.store.state().active_board().key, "medium");
    }

    #[test]
    fn delete_keeps_focus_in_range() {
        let mut app = app("medium", false);
        app.focus = Focus { bucket: BucketId::Available, slot: 4 };

        app.delete_focused();

        assert_eq!(ids(&app, BucketId::Available).len(), 4);
        assert_eq!(app.focus.slot, 4);
        assert_eq!(app.focus_target(), "available");
    }

    #[test]
    fn deleting_carried_piece_ends_the_drag() {
        let mut app = app("medium", false);
        app.pick_or_drop();
        assert_eq!(app.gestures.dragging().map(|id| id.as_str()), Some("item-1"));

        app.delete_focused();

        assert!(app.gestures.dragging().is_none());
        assert!(!app.store.state().contains(&ItemId::from("item-1")));
        assert_eq!(app.status.as_deref(), Some("Deleted Small"));
    }

    #[test]
    fn export_writes_into_export_dir() {
        let mut app = app("medium", false);
        let dir = tempfile::tempdir().unwrap();
        app.export_dir = dir.path().to_path_buf();

        app.export_layout(ExportFormat::Json);

        assert!(dir.path().join("grooveboard_layout.json").exists());
        assert!(app.last_error.is_none());
    }

    #[test]
    fn hit_map_prefers_later_regions() {
        let mut hits = HitMap::default();
        hits.push(Rect::new(0, 0, 20, 3), HitTarget::Bucket(BucketId::Row1));
        hits.push(Rect::new(2, 1, 5, 1), HitTarget::Item(ItemId::from("item-1")));

        assert_eq!(hits.at(3, 1), Some(&HitTarget::Item(ItemId::from("item-1"))));
        assert_eq!(hits.at(10, 1), Some(&HitTarget::Bucket(BucketId::Row1)));
        assert_eq!(hits.at(30, 1), None);
    }
}
