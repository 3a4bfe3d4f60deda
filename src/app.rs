use crate::config::Config;
use crate::dialog::{Prompt, PromptOutcome};
use crate::drag::DragCoordinator;
use crate::kanban_board::{KanbanBoard, StatusChange};
use crate::storage::Storage;
use crate::task::{Column, TaskId, TaskPatch};
use crate::theme::Theme;
use crate::toast::Toast;
use crate::ui::HitMap;
use crate::view::{self, BoardView, CardView};
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Position;
use std::{
    rc::Rc,
    time::{Duration, Instant},
};
use tracing::debug;

/// What a submitted prompt feeds into next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    AddTitle { status: String },
    AddDescription { status: String, title: String },
    EditTitle { id: TaskId },
    EditDescription { id: TaskId, title: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Prompting { prompt: Prompt, flow: Flow },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingRemoval {
    id: TaskId,
    due: Instant,
}

pub struct App {
    board: KanbanBoard,
    storage: Rc<dyn Storage>,
    columns: Vec<Column>,
    theme: Theme,
    mode: Mode,
    drag: DragCoordinator,
    selected_column: usize,
    selected_task: usize,
    removal: Option<PendingRemoval>,
    toast: Option<Toast>,
    toast_ttl: Duration,
    exit_transition: Duration,
    hits: HitMap,
    should_quit: bool,
}

impl App {
    pub fn new(storage: Rc<dyn Storage>, config: &Config) -> Self {
        let board = KanbanBoard::load(Rc::clone(&storage));
        let theme = Theme::load(storage.as_ref());
        Self {
            board,
            storage,
            columns: config.columns.clone(),
            theme,
            mode: Mode::Normal,
            drag: DragCoordinator::default(),
            selected_column: 0,
            selected_task: 0,
            removal: None,
            toast: None,
            toast_ttl: config.toast_ttl(),
            exit_transition: config.exit_transition(),
            hits: HitMap::default(),
            should_quit: false,
        }
    }

    pub fn board(&self) -> &KanbanBoard {
        &self.board
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn view(&self) -> BoardView {
        view::render(self.board.tasks(), &self.columns)
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn drag(&self) -> &DragCoordinator {
        &self.drag
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    pub fn selected_column(&self) -> usize {
        self.selected_column
    }

    pub fn selected_task(&self) -> usize {
        self.selected_task
    }

    pub fn is_removing(&self, id: TaskId) -> bool {
        self.removal.is_some_and(|r| r.id == id)
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub(crate) fn set_hits(&mut self, hits: HitMap) {
        self.hits = hits;
    }

    pub fn selected_card(&self) -> Option<CardView> {
        let view = self.view();
        view.columns
            .get(self.selected_column)?
            .cards
            .get(self.selected_task)
            .cloned()
    }

    pub fn handle_event(&mut self, event: Event, now: Instant) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key, now),
            Event::Mouse(mouse) => self.handle_mouse(mouse, now),
            _ => {}
        }
    }

    /// Advances time-based state: expired toasts and finished exit
    /// transitions.
    pub fn tick(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|t| t.is_expired(now)) {
            self.toast = None;
        }
        if let Some(removal) = self.removal {
            if now >= removal.due {
                self.finish_removal();
            }
        }
    }

    /// Applies anything still in flight. Called before exit.
    pub fn finish(&mut self) {
        self.finish_removal();
        self.drag.end();
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if let Mode::Prompting { prompt, .. } = &mut self.mode {
            let outcome = prompt.handle_key(key);
            match outcome {
                PromptOutcome::Pending => {}
                PromptOutcome::Submitted(value) => self.submit_prompt(Some(value)),
                PromptOutcome::Cancelled => self.submit_prompt(None),
            }
            return;
        }

        if self.drag.is_dragging() {
            self.handle_drag_key(key, now);
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true
            }
            KeyCode::Left | KeyCode::Char('h') => self.focus_column(-1),
            KeyCode::Right | KeyCode::Char('l') => self.focus_column(1),
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_task = self.selected_task.saturating_sub(1)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let len = self.column_len(self.selected_column);
                if self.selected_task + 1 < len {
                    self.selected_task += 1;
                }
            }
            KeyCode::Char('a') => self.begin_add(self.selected_column),
            KeyCode::Char('e') => {
                if let Some(card) = self.selected_card() {
                    self.begin_edit(card.id);
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(card) = self.selected_card() {
                    self.delete(card.id, now);
                }
            }
            KeyCode::Char('m') | KeyCode::Char(' ') => {
                if let Some(card) = self.selected_card() {
                    self.drag.start(card.id, self.selected_column);
                }
            }
            KeyCode::Char('t') => self.toggle_theme(),
            _ => {}
        }
    }

    fn handle_drag_key(&mut self, key: KeyEvent, now: Instant) {
        let last = self.columns.len().saturating_sub(1);
        let hover = self.drag.hover().unwrap_or(self.selected_column);
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.drag.over(hover.saturating_sub(1)),
            KeyCode::Right | KeyCode::Char('l') => self.drag.over((hover + 1).min(last)),
            KeyCode::Enter | KeyCode::Char('m') | KeyCode::Char(' ') => self.drop_on(hover, now),
            KeyCode::Esc => self.drag.end(),
            _ => {}
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        if matches!(self.mode, Mode::Prompting { .. }) {
            return;
        }
        let pos = Position::new(mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(column) = self.hits.add_button_at(pos) {
                    self.begin_add(column);
                } else if let Some(id) = self.hits.edit_button_at(pos) {
                    self.follow(id);
                    self.begin_edit(id);
                } else if let Some(id) = self.hits.delete_button_at(pos) {
                    self.follow(id);
                    self.delete(id, now);
                } else if let Some(id) = self.hits.card_at(pos) {
                    let Some((column, row)) = self.view().locate(id) else {
                        return;
                    };
                    self.selected_column = column;
                    self.selected_task = row;
                    self.drag.start(id, column);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if self.drag.is_dragging() {
                    match self.hits.column_at(pos) {
                        Some(column) => self.drag.over(column),
                        None => self.drag.leave(),
                    }
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if self.drag.is_dragging() {
                    match self.hits.column_at(pos) {
                        Some(column) => self.drop_on(column, now),
                        None => self.drag.end(),
                    }
                }
            }
            _ => {}
        }
    }

    fn drop_on(&mut self, column: usize, now: Instant) {
        let Some((id, column)) = self.drag.drop_on(column) else {
            return;
        };
        let Some(target) = self.columns.get(column) else {
            return;
        };
        let target_title = target.title.clone();

        match self.board.set_status(id, &target.id) {
            StatusChange::Moved { from, to } => {
                debug!(%id, %from, %to, "card dropped on new column");
                let title = self.board.get(id).map(|t| t.title.clone()).unwrap_or_default();
                self.notify(format!("Moved \"{title}\" to {target_title}"), now);
                self.follow(id);
            }
            StatusChange::Unchanged => debug!(%id, "card dropped on its own column"),
            StatusChange::Missing => debug!(%id, "dropped card no longer exists"),
        }
    }

    fn begin_add(&mut self, column: usize) {
        let Some(status) = self.columns.get(column).map(|c| c.id.clone()) else {
            return;
        };
        self.selected_column = column;
        self.mode = Mode::Prompting {
            prompt: Prompt::new("Enter task title"),
            flow: Flow::AddTitle { status },
        };
    }

    fn begin_edit(&mut self, id: TaskId) {
        let Some(task) = self.board.get(id) else {
            return;
        };
        self.mode = Mode::Prompting {
            prompt: Prompt::with_value("Edit title", &task.title),
            flow: Flow::EditTitle { id },
        };
    }

    /// Resolves the active prompt. `None` means it was cancelled.
    fn submit_prompt(&mut self, value: Option<String>) {
        let Mode::Prompting { flow, .. } = std::mem::replace(&mut self.mode, Mode::Normal) else {
            return;
        };

        match (flow, value) {
            (Flow::AddTitle { status }, Some(title)) => {
                if title.trim().is_empty() {
                    debug!("add aborted: empty title");
                    return;
                }
                self.mode = Mode::Prompting {
                    prompt: Prompt::new("Enter task description"),
                    flow: Flow::AddDescription { status, title },
                };
            }
            (Flow::AddDescription { status, title }, description) => {
                let description = description.unwrap_or_default();
                if let Some(id) = self.board.add(&title, &description, &status) {
                    self.follow(id);
                }
            }
            (Flow::EditTitle { id }, Some(title)) => {
                let Some(task) = self.board.get(id) else {
                    return;
                };
                self.mode = Mode::Prompting {
                    prompt: Prompt::with_value("Edit description", &task.description),
                    flow: Flow::EditDescription { id, title },
                };
            }
            (Flow::EditDescription { id, title }, Some(description)) => {
                self.board.update(id, TaskPatch::text(title, description));
            }
            (flow, None) => debug!(?flow, "prompt cancelled"),
        }
    }

    fn delete(&mut self, id: TaskId, now: Instant) {
        if self.exit_transition.is_zero() {
            self.board.remove(id);
            self.clamp_selection();
            return;
        }
        // A second delete during a transition settles the first one.
        if self.removal.is_some_and(|r| r.id != id) {
            self.finish_removal();
        }
        self.removal = Some(PendingRemoval {
            id,
            due: now + self.exit_transition,
        });
    }

    fn finish_removal(&mut self) {
        if let Some(removal) = self.removal.take() {
            self.board.remove(removal.id);
            self.clamp_selection();
        }
    }

    fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        self.theme.save(self.storage.as_ref());
        debug!(theme = self.theme.as_str(), "theme toggled");
    }

    fn notify(&mut self, message: String, now: Instant) {
        self.toast = Some(Toast::new(message, now, self.toast_ttl));
    }

    fn focus_column(&mut self, delta: isize) {
        let last = self.columns.len().saturating_sub(1) as isize;
        self.selected_column = (self.selected_column as isize + delta).clamp(0, last) as usize;
        self.clamp_selection();
    }

    /// Moves the selection onto the card with `id`, wherever it is shown.
    fn follow(&mut self, id: TaskId) {
        if let Some((column, row)) = self.view().locate(id) {
            self.selected_column = column;
            self.selected_task = row;
        }
    }

    fn column_len(&self, column: usize) -> usize {
        self.columns
            .get(column)
            .map_or(0, |c| self.board.tasks_by_status(&c.id).len())
    }

    fn clamp_selection(&mut self) {
        let len = self.column_len(self.selected_column);
        self.selected_task = self.selected_task.min(len.saturating_sub(1));
    }
}
