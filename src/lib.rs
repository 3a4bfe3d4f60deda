//! A terminal kanban board: tasks live in a small store that is written
//! through to local key-value storage, and the board is redrawn from that
//! store on every frame.

pub mod app;
pub mod config;
pub mod dialog;
pub mod drag;
pub mod error;
pub mod html;
pub mod kanban_board;
pub mod storage;
pub mod task;
pub mod theme;
pub mod toast;
pub mod ui;
pub mod view;

pub use app::App;
pub use config::Config;
pub use kanban_board::{KanbanBoard, StatusChange};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use task::{Column, Task, TaskId, TaskPatch};
