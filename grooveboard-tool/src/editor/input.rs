use std::time::Instant;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};

use super::app::{AppMode, EditorApp, HitTarget, Press};
use crate::export::ExportFormat;

pub fn handle_event(app: &mut EditorApp, event: Event, now: Instant) {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(app, key),
        Event::Mouse(mouse) => handle_mouse(app, mouse, now),
        _ => {}
    }
}

fn handle_key(app: &mut EditorApp, key: KeyEvent) {
    // The capacity alert blocks everything until dismissed.
    if app.gestures.notice().is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            app.dismiss_notice();
        }
        return;
    }
    if app.gestures.menu().is_some() {
        handle_menu_key(app, key);
        return;
    }
    match app.mode {
        AppMode::Edit => handle_edit_key(app, key),
        AppMode::SelectBoard | AppMode::SelectTemplate => handle_popup_key(app, key),
    }
}

fn handle_edit_key(app: &mut EditorApp, key: KeyEvent) {
    app.last_error = None;
    match key.code {
        KeyCode::Esc if app.gestures.dragging().is_some() => app.cancel_drag(),
        KeyCode::Esc | KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Left => app.focus_left(),
        KeyCode::Right => app.focus_right(),
        KeyCode::Up => app.focus_up(),
        KeyCode::Down => app.focus_down(),
        KeyCode::Char(' ') => app.pick_or_drop(),
        KeyCode::Enter => app.open_menu(),
        KeyCode::Char('n') => app.open_template_picker(),
        KeyCode::Char('b') => app.open_board_picker(),
        KeyCode::Char('x') | KeyCode::Delete => app.delete_focused(),
        KeyCode::Char('e') => app.export_layout(ExportFormat::Json),
        KeyCode::Char('y') => app.export_layout(ExportFormat::Yaml),
        KeyCode::Char('t') => app.toggle_mode(),
        _ => {}
    }
}

fn handle_menu_key(app: &mut EditorApp, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_menu(),
        KeyCode::Enter => app.menu_choose(app.menu_selected),
        KeyCode::Up => app.menu_up(),
        KeyCode::Down => app.menu_down(),
        _ => {}
    }
}

fn handle_popup_key(app: &mut EditorApp, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_popup(),
        KeyCode::Enter => app.popup_select(),
        KeyCode::Up => app.popup_up(),
        KeyCode::Down => app.popup_down(),
        _ => {}
    }
}

fn handle_mouse(app: &mut EditorApp, mouse: MouseEvent, now: Instant) {
    let hit = app.hits.at(mouse.column, mouse.row).cloned();
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => press(app, hit, now),
        MouseEventKind::Drag(MouseButton::Left) => drag(app),
        MouseEventKind::Up(MouseButton::Left) => release(app, hit),
        _ => {}
    }
}

fn press(app: &mut EditorApp, hit: Option<HitTarget>, now: Instant) {
    if app.gestures.notice().is_some() {
        app.dismiss_notice();
        return;
    }
    if app.mode != AppMode::Edit {
        return;
    }
    if app.gestures.menu().is_some() {
        match hit {
            Some(HitTarget::MenuEntry(index)) => app.menu_choose(index),
            _ => app.close_menu(),
        }
        return;
    }
    if let Some(HitTarget::Item(id)) = hit {
        app.focus_item(&id);
        app.gestures.long_press_start(id.clone(), now);
        app.press = Some(Press {
            item: id,
            dragging: false,
        });
    }
}

fn drag(app: &mut EditorApp) {
    let Some(press) = app.press.as_mut() else {
        return;
    };
    if !press.dragging {
        press.dragging = true;
        let item = press.item.clone();
        app.gestures.drag_start(&app.store, &item);
    }
}

fn release(app: &mut EditorApp, hit: Option<HitTarget>) {
    let Some(press) = app.press.take() else {
        return;
    };
    app.gestures.long_press_end();

    if press.dragging {
        let over = hit.as_ref().and_then(HitTarget::drop_target);
        let outcome = app
            .gestures
            .drag_end(&mut app.store, &press.item, over.as_deref());
        if outcome.is_some() {
            app.focus_item(&press.item);
        }
    } else if app.gestures.menu().is_none() {
        app.gestures.click(&app.store, &press.item);
        app.menu_selected = 0;
    }
}
