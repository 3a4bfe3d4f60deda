use crate::app::{App, Mode};
use crate::task::TaskId;
use crate::view::{self, ColumnView};
use crossterm::event;
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use std::{
    io,
    time::{Duration, Instant},
};

const CARD_HEIGHT: u16 = 3;
const EDIT_LABEL: &str = "[edit]";
const DELETE_LABEL: &str = "[delete]";
const TICK: Duration = Duration::from_millis(50);

/// Screen regions from the last frame, used to resolve mouse events.
/// Rebuilt on every draw, so no region outlives the cards it points at.
#[derive(Debug, Clone, Default)]
pub struct HitMap {
    columns: Vec<Rect>,
    add_buttons: Vec<Rect>,
    cards: Vec<(Rect, TaskId)>,
    edit_buttons: Vec<(Rect, TaskId)>,
    delete_buttons: Vec<(Rect, TaskId)>,
}

fn find_at(regions: &[(Rect, TaskId)], pos: Position) -> Option<TaskId> {
    regions
        .iter()
        .find(|(area, _)| area.contains(pos))
        .map(|(_, id)| *id)
}

fn find_id(regions: &[(Rect, TaskId)], id: TaskId) -> Option<Rect> {
    regions
        .iter()
        .find(|(_, card)| *card == id)
        .map(|(area, _)| *area)
}

impl HitMap {
    pub fn column_at(&self, pos: Position) -> Option<usize> {
        self.columns.iter().position(|area| area.contains(pos))
    }

    pub fn add_button_at(&self, pos: Position) -> Option<usize> {
        self.add_buttons.iter().position(|area| area.contains(pos))
    }

    pub fn card_at(&self, pos: Position) -> Option<TaskId> {
        find_at(&self.cards, pos)
    }

    pub fn edit_button_at(&self, pos: Position) -> Option<TaskId> {
        find_at(&self.edit_buttons, pos)
    }

    pub fn delete_button_at(&self, pos: Position) -> Option<TaskId> {
        find_at(&self.delete_buttons, pos)
    }

    pub fn columns(&self) -> &[Rect] {
        &self.columns
    }

    pub fn add_buttons(&self) -> &[Rect] {
        &self.add_buttons
    }

    pub fn card(&self, id: TaskId) -> Option<Rect> {
        find_id(&self.cards, id)
    }

    pub fn edit_button(&self, id: TaskId) -> Option<Rect> {
        find_id(&self.edit_buttons, id)
    }

    pub fn delete_button(&self, id: TaskId) -> Option<Rect> {
        find_id(&self.delete_buttons, id)
    }
}

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    while !app.should_quit() {
        terminal.draw(|f| {
            draw(f, app);
        })?;

        if event::poll(TICK)? {
            let event = event::read()?;
            app.handle_event(event, Instant::now());
        }
        app.tick(Instant::now());
    }
    app.finish();
    Ok(())
}

/// Rebuilds the whole board from the store and records fresh hit regions.
pub fn draw(f: &mut Frame, app: &mut App) -> HitMap {
    let palette = app.theme().palette();
    let board = view::render(app.board().tasks(), app.columns());
    let mut hits = HitMap::default();

    f.render_widget(Block::default().style(palette.base), f.area());

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    let column_count = board.columns.len().max(1) as u32;
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            board
                .columns
                .iter()
                .map(|_| Constraint::Ratio(1, column_count))
                .collect::<Vec<_>>(),
        )
        .split(rows[0]);

    let prompting = matches!(app.mode(), Mode::Prompting { .. });
    for (i, column) in board.columns.iter().enumerate() {
        let area = chunks[i];
        hits.columns.push(area);

        let border_style = if app.drag().hover() == Some(i) {
            palette.drop_target
        } else if app.selected_column() == i {
            palette.focus
        } else {
            palette.border
        };
        let block = Block::default()
            .title(format!(" {} ({}) ", view::sanitize(&column.title), column.count()))
            .borders(Borders::ALL)
            .border_style(border_style);
        let inner = block.inner(area);
        f.render_widget(block, area);

        if inner.height == 0 {
            continue;
        }
        let add_area = Rect { height: 1, ..inner };
        f.render_widget(
            Paragraph::new(Line::from(Span::styled("+ add", palette.muted))),
            add_area,
        );
        hits.add_buttons.push(add_area);

        let selected = (!prompting && app.selected_column() == i).then(|| app.selected_task());
        draw_cards(f, app, column, selected, inner, &mut hits);
    }

    draw_footer(f, app, rows[1]);

    if let Mode::Prompting { prompt, .. } = app.mode() {
        let area = centered(f.area(), 60, 3);
        let block = Block::default()
            .title(format!(" {} ", prompt.label()))
            .borders(Borders::ALL)
            .border_style(palette.focus)
            .style(palette.base);
        let inner = block.inner(area);
        f.render_widget(Clear, area);
        f.render_widget(block, area);
        f.render_widget(Paragraph::new(prompt.value()), inner);

        let offset = (prompt.cursor() as u16).min(inner.width.saturating_sub(1));
        f.set_cursor_position((inner.x + offset, inner.y));
    }

    app.set_hits(hits.clone());
    hits
}

fn draw_cards(
    f: &mut Frame,
    app: &App,
    column: &ColumnView,
    selected: Option<usize>,
    inner: Rect,
    hits: &mut HitMap,
) {
    let palette = app.theme().palette();
    let body_height = inner.height.saturating_sub(1);
    let visible = (body_height / CARD_HEIGHT).max(1) as usize;
    let offset = match selected {
        Some(row) if row >= visible => row + 1 - visible,
        _ => 0,
    };

    let mut y = inner.y + 1;
    for (row, card) in column.cards.iter().enumerate().skip(offset) {
        if y + CARD_HEIGHT > inner.y + inner.height {
            break;
        }
        let area = Rect {
            x: inner.x,
            y,
            width: inner.width,
            height: CARD_HEIGHT,
        };

        let mut title_style = Style::default().add_modifier(Modifier::BOLD);
        let mut body_style = palette.muted;
        if app.drag().is_source(card.id) {
            title_style = title_style.patch(palette.dragging);
            body_style = body_style.patch(palette.dragging);
        }
        if app.is_removing(card.id) {
            title_style = title_style.add_modifier(Modifier::CROSSED_OUT);
            body_style = body_style.add_modifier(Modifier::CROSSED_OUT);
        }

        let description = if card.description.is_empty() {
            "(no description)".to_string()
        } else {
            view::sanitize(&card.description)
        };
        let lines = vec![
            Line::from(Span::styled(view::sanitize(&card.title), title_style)),
            Line::from(Span::styled(description, body_style)),
            Line::from(vec![
                Span::styled(EDIT_LABEL, palette.focus),
                Span::raw(" "),
                Span::styled(DELETE_LABEL, palette.focus),
            ]),
        ];

        let mut paragraph = Paragraph::new(lines);
        if selected == Some(row) {
            paragraph = paragraph.style(palette.selected);
        }
        f.render_widget(paragraph, area);
        hits.cards.push((area, card.id));

        let controls_y = y + CARD_HEIGHT - 1;
        let edit = Rect::new(inner.x, controls_y, EDIT_LABEL.len() as u16, 1).intersection(area);
        let delete = Rect::new(
            inner.x + EDIT_LABEL.len() as u16 + 1,
            controls_y,
            DELETE_LABEL.len() as u16,
            1,
        )
        .intersection(area);
        hits.edit_buttons.push((edit, card.id));
        hits.delete_buttons.push((delete, card.id));

        y += CARD_HEIGHT;
    }
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let palette = app.theme().palette();
    let line = if let Some(toast) = app.toast() {
        Line::from(Span::styled(format!(" {} ", toast.message()), palette.toast))
    } else {
        let help = match app.mode() {
            Mode::Prompting { .. } => "Enter: confirm | Esc: cancel",
            Mode::Normal if app.drag().is_dragging() => {
                "←/→: choose column | Enter: drop | Esc: cancel drag"
            }
            Mode::Normal => {
                "a: Add | e: Edit | d: Delete | m/drag: Move | ←/→/↑/↓: Select | t: Theme | q: Quit"
            }
        };
        Line::from(Span::styled(help, palette.muted))
    };
    f.render_widget(Paragraph::new(line), area);
}

fn centered(area: Rect, percent_x: u16, height: u16) -> Rect {
    let width = ((u32::from(area.width) * u32::from(percent_x) / 100) as u16)
        .max(20)
        .min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
