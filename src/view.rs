//! Pure projection of the task list onto the board's columns.
//!
//! The view is rebuilt from scratch on every frame. Cards whose status
//! names no known column are left out of the view but stay in the store.

use crate::task::{Column, Task, TaskId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub id: TaskId,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnView {
    pub id: String,
    pub title: String,
    pub cards: Vec<CardView>,
}

impl ColumnView {
    pub fn count(&self) -> usize {
        self.cards.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoardView {
    pub columns: Vec<ColumnView>,
}

impl BoardView {
    pub fn column(&self, id: &str) -> Option<&ColumnView> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn counts(&self) -> Vec<(&str, usize)> {
        self.columns
            .iter()
            .map(|c| (c.id.as_str(), c.count()))
            .collect()
    }

    /// Column index and position of a card, if it is visible.
    pub fn locate(&self, id: TaskId) -> Option<(usize, usize)> {
        self.columns.iter().enumerate().find_map(|(col, column)| {
            column
                .cards
                .iter()
                .position(|card| card.id == id)
                .map(|row| (col, row))
        })
    }
}

pub fn render(tasks: &[Task], columns: &[Column]) -> BoardView {
    let mut view = BoardView {
        columns: columns
            .iter()
            .map(|c| ColumnView {
                id: c.id.clone(),
                title: c.title.clone(),
                cards: Vec::new(),
            })
            .collect(),
    };

    for task in tasks {
        let Some(column) = view.columns.iter_mut().find(|c| c.id == task.status) else {
            continue;
        };
        column.cards.push(CardView {
            id: task.id,
            title: task.title.clone(),
            description: task.description.clone(),
        });
    }

    view
}

/// Replaces control characters so stored text cannot drive the terminal.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { '\u{FFFD}' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::default_columns;

    fn task(id: i64, title: &str, status: &str) -> Task {
        Task {
            id: TaskId(id),
            title: title.to_string(),
            description: String::new(),
            status: status.to_string(),
        }
    }

    #[test]
    fn groups_cards_by_status_in_list_order() {
        let tasks = vec![
            task(1, "a", "todo"),
            task(2, "b", "done"),
            task(3, "c", "todo"),
        ];
        let view = render(&tasks, &default_columns());

        let todo: Vec<_> = view.column("todo").unwrap().cards.iter().map(|c| c.id).collect();
        assert_eq!(todo, [TaskId(1), TaskId(3)]);
        assert_eq!(
            view.counts(),
            [("todo", 2), ("in-progress", 0), ("done", 1)]
        );
    }

    #[test]
    fn orphaned_status_is_hidden_not_lost() {
        let tasks = vec![task(1, "lost", "archived"), task(2, "kept", "done")];
        let view = render(&tasks, &default_columns());

        assert_eq!(view.locate(TaskId(1)), None);
        assert_eq!(view.locate(TaskId(2)), Some((2, 0)));
        assert_eq!(tasks.len(), 2);
    }

    #[test]
    fn rendering_is_idempotent() {
        let tasks = vec![task(1, "a", "todo"), task(2, "b", "in-progress")];
        let columns = default_columns();
        assert_eq!(render(&tasks, &columns), render(&tasks, &columns));
    }

    #[test]
    fn sanitize_strips_escape_sequences() {
        assert_eq!(sanitize("ok\u{1b}[2Jdone"), "ok\u{FFFD}[2Jdone");
        assert_eq!(sanitize("plain <b>"), "plain <b>");
    }
}
