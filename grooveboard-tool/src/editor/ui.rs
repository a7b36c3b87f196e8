use grooveboard_core::{BucketId, Item, RowUsage};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use unicode_segmentation::UnicodeSegmentation;

use super::app::{AppMode, EditorApp, HitTarget};

const PIECE_COLORS: [Color; 3] = [Color::Blue, Color::Magenta, Color::Cyan];
const MIN_PIECE_CELLS: u16 = 3;

fn truncate_str(s: &str, max_graphemes: usize) -> &str {
    match s.grapheme_indices(true).nth(max_graphemes) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

pub fn render(frame: &mut Frame, app: &mut EditorApp) {
    app.hits.clear();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Length(3), // Back row
            Constraint::Length(3), // Middle row
            Constraint::Length(3), // Front row
            Constraint::Min(3),    // Available pool
            Constraint::Length(1), // Status
            Constraint::Length(1), // Help
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    let usages = app.store.state().row_usage();
    for (usage, area) in usages.iter().zip(&chunks[1..4]) {
        render_row(frame, app, usage, *area);
    }
    render_available(frame, app, chunks[4]);
    render_status(frame, app, chunks[5]);
    render_help(frame, app, chunks[6]);

    match app.mode {
        AppMode::SelectBoard => render_board_popup(frame, app),
        AppMode::SelectTemplate => render_template_popup(frame, app),
        AppMode::Edit => {}
    }
    if app.gestures.menu().is_some() {
        render_menu_popup(frame, app);
    }
    if app.gestures.notice().is_some() {
        render_alert(frame, app);
    }
}

fn render_header(frame: &mut Frame, app: &EditorApp, area: Rect) {
    let board = app.store.state().active_board();
    let mut spans = vec![
        Span::styled(
            format!("groove - {}", board.label),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("  {} units per row  {}  [{}]", board.capacity, board.price, app.gestures.mode())),
    ];
    if let Some(id) = app.gestures.dragging() {
        spans.push(Span::styled(
            format!("  carrying {}", id),
            Style::default().fg(Color::Yellow),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn capacity_line(usage: &RowUsage) -> Line<'static> {
    let text = format!(
        " Capacity: {}/{} units ({} remaining) ",
        usage.used, usage.capacity, usage.remaining
    );
    let style = if usage.remaining <= 0 {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Line::from(Span::styled(text, style))
}

fn bucket_block(app: &EditorApp, bucket: BucketId) -> Block<'static> {
    let free_space_focused = app.focus.bucket == bucket
        && app.focus.slot >= app.store.state().items(bucket).len();
    let border = if free_space_focused {
        Style::default().fg(Color::Yellow)
    } else if app.focus.bucket == bucket {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(format!(" {} ", bucket.title()))
}

fn piece_style(app: &EditorApp, bucket: BucketId, index: usize, item: &Item) -> Style {
    if app.gestures.dragging() == Some(&item.id) {
        return Style::default().fg(Color::Black).bg(Color::Yellow);
    }
    let style = Style::default()
        .fg(Color::White)
        .bg(PIECE_COLORS[index % PIECE_COLORS.len()]);
    if app.focus.bucket == bucket && app.focus.slot == index {
        style.add_modifier(Modifier::REVERSED | Modifier::BOLD)
    } else {
        style
    }
}

/// Cells for a piece, proportional to the groove width.
fn piece_cells(units: u32, row_width: u16, capacity: u32) -> u16 {
    let scaled = u64::from(units) * u64::from(row_width) / u64::from(capacity.max(1));
    u16::try_from(scaled).unwrap_or(u16::MAX).max(MIN_PIECE_CELLS)
}

/// First visible line of a `len`-line list showing `height` lines, kept so
/// that `focus` stays on screen.
fn scroll_window(offset: usize, focus: Option<usize>, len: usize, height: usize) -> usize {
    let mut offset = offset.min(len.saturating_sub(height));
    if let Some(focus) = focus.map(|f| f.min(len.saturating_sub(1))) {
        if focus < offset {
            offset = focus;
        } else if height > 0 && focus >= offset + height {
            offset = focus + 1 - height;
        }
    }
    offset
}

fn render_row(frame: &mut Frame, app: &mut EditorApp, usage: &RowUsage, area: Rect) {
    let block = bucket_block(app, usage.bucket).title_bottom(capacity_line(usage));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    app.hits.push(area, HitTarget::Bucket(usage.bucket));

    let items = app.store.state().items(usage.bucket);
    let right = inner.right();
    let mut x = inner.x;
    let mut hidden = 0;
    let mut pieces = Vec::new();
    for (index, item) in items.iter().enumerate() {
        if x >= right {
            hidden = items.len() - index;
            break;
        }
        let cells = piece_cells(item.units(), inner.width, usage.capacity).min(right - x);
        let piece = Rect::new(x, inner.y, cells, inner.height.min(1));
        let label = format!(" {} {}", item.text, item.units());
        let label = truncate_str(&label, cells as usize).to_string();
        pieces.push((piece, label, piece_style(app, usage.bucket, index, item), item.id.clone()));
        x += cells;
    }
    let focus_hidden =
        app.focus.bucket == usage.bucket && app.focus.slot >= items.len() - hidden && app.focus.slot < items.len();

    for (piece, label, style, id) in pieces {
        frame.render_widget(Paragraph::new(label).style(style), piece);
        app.hits.push(piece, HitTarget::Item(id));
    }

    if hidden > 0 {
        let marker = format!("…+{}", hidden);
        let cells = (marker.graphemes(true).count() as u16).min(inner.width);
        let area = Rect::new(right - cells, inner.y, cells, inner.height.min(1));
        let style = if focus_hidden {
            Style::default().fg(Color::Black).bg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White).bg(Color::Red)
        };
        frame.render_widget(Paragraph::new(marker).style(style), area);
        app.hits.push(area, HitTarget::Bucket(usage.bucket));
    }
}

fn render_available(frame: &mut Frame, app: &mut EditorApp, area: Rect) {
    let len = app.store.state().items(BucketId::Available).len();
    let height = bucket_block(app, BucketId::Available).inner(area).height as usize;
    let focus = (app.focus.bucket == BucketId::Available).then_some(app.focus.slot);
    app.pool_offset = scroll_window(app.pool_offset, focus, len, height);
    let offset = app.pool_offset;

    let mut block = bucket_block(app, BucketId::Available);
    if len > height {
        let last = (offset + height).min(len);
        block = block.title_bottom(format!(" {}-{} of {} ", offset + 1, last, len));
    }
    let inner = block.inner(area);
    frame.render_widget(block, area);
    app.hits.push(area, HitTarget::Bucket(BucketId::Available));

    let mut lines = Vec::new();
    let items = app.store.state().items(BucketId::Available);
    for (row, (index, item)) in items.iter().enumerate().skip(offset).take(height).enumerate() {
        let line = Rect::new(inner.x, inner.y + row as u16, inner.width, 1);
        let visual = if item.visual_ref.is_some() { " [img]" } else { "" };
        let text = format!(" {} ({} units){}", item.text, item.units(), visual);
        let text = truncate_str(&text, inner.width as usize).to_string();
        lines.push((line, text, piece_style(app, BucketId::Available, index, item), item.id.clone()));
    }

    for (line, text, style, id) in lines {
        frame.render_widget(Paragraph::new(text).style(style), line);
        app.hits.push(line, HitTarget::Item(id));
    }
}

fn render_status(frame: &mut Frame, app: &EditorApp, area: Rect) {
    let line = if let Some(error) = &app.last_error {
        Line::from(Span::styled(format!("Error: {}", error), Style::default().fg(Color::Red)))
    } else if let Some(status) = &app.status {
        Line::from(Span::styled(status.clone(), Style::default().fg(Color::Green)))
    } else {
        Line::default()
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_help(frame: &mut Frame, app: &EditorApp, area: Rect) {
    let help = if app.gestures.notice().is_some() {
        "Enter: Dismiss"
    } else if app.gestures.menu().is_some() || app.mode != AppMode::Edit {
        "↑/↓: Navigate  Enter: Select  Esc: Cancel"
    } else if app.gestures.dragging().is_some() {
        "←↑↓→: Aim  Space: Drop  Esc: Cancel"
    } else {
        "←↑↓→: Focus  Space: Pick up  Enter: Move  n: New  b: Board  x: Delete  e/y: Export  t: Touch  q: Quit"
    };
    frame.render_widget(Paragraph::new(help).style(Style::default().fg(Color::DarkGray)), area);
}

fn render_popup(frame: &mut Frame, title: &str, items: Vec<ListItem>, selected: usize) -> Rect {
    let area = centered_rect(50, 50, frame.area());

    frame.render_widget(Clear, area);

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(selected));

    frame.render_stateful_widget(list, area, &mut state);
    area
}

fn render_board_popup(frame: &mut Frame, app: &EditorApp) {
    let active = &app.store.state().active_board().key;
    let items: Vec<ListItem> = app
        .boards
        .all()
        .iter()
        .map(|board| {
            let is_active = &board.key == active;
            let style = if !board.in_stock {
                Style::default().fg(Color::DarkGray)
            } else if is_active {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            let stock = if board.in_stock { "" } else { " (out of stock)" };
            let marker = if is_active { " ✓" } else { "" };
            let mut lines = vec![Line::from(format!(
                "{} - {} - {} units{}{}",
                board.label, board.price, board.capacity, stock, marker
            ))];
            if !board.description.is_empty() {
                lines.push(Line::from(Span::styled(
                    board.description.clone(),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            ListItem::new(lines).style(style)
        })
        .collect();

    render_popup(frame, " Board Size ", items, app.popup_selected);
}

fn render_template_popup(frame: &mut Frame, app: &EditorApp) {
    let items: Vec<ListItem> = app
        .templates
        .all()
        .iter()
        .map(|template| {
            let visual = if template.visual_ref.is_some() { " [img]" } else { "" };
            ListItem::new(format!("{} ({} units){}", template.text, template.width, visual))
        })
        .collect();

    render_popup(frame, " Add Piece ", items, app.popup_selected);
}

fn render_menu_popup(frame: &mut Frame, app: &mut EditorApp) {
    let Some(menu) = app.gestures.menu() else {
        return;
    };
    let text = app
        .store
        .locate(&menu.item)
        .map(|(_, item)| item.text.clone())
        .unwrap_or_else(|| menu.item.to_string());
    let targets = menu.targets.clone();

    let mut items: Vec<ListItem> = targets
        .iter()
        .map(|bucket| ListItem::new(bucket.title()))
        .collect();
    if items.is_empty() {
        items.push(ListItem::new("No room anywhere").style(Style::default().fg(Color::DarkGray)));
    }

    let title = format!(" Move {} to ", text);
    let area = render_popup(frame, &title, items, app.menu_selected);

    let inner = Block::default().borders(Borders::ALL).inner(area);
    for index in 0..targets.len().min(inner.height as usize) {
        let entry = Rect::new(inner.x, inner.y + index as u16, inner.width, 1);
        app.hits.push(entry, HitTarget::MenuEntry(index));
    }
}

fn render_alert(frame: &mut Frame, app: &EditorApp) {
    let Some(notice) = app.gestures.notice() else {
        return;
    };
    let area = centered_rect(60, 25, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" Alert ");
    let text = vec![
        Line::from(Span::styled(notice.to_string(), Style::default().add_modifier(Modifier::BOLD))),
        Line::default(),
        Line::from(Span::styled("Press Enter to dismiss", Style::default().fg(Color::DarkGray))),
    ];
    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
