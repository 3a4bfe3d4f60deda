use proptest::prelude::*;
use std::rc::Rc;
use taskboard::storage::TASKS_KEY;
use taskboard::{KanbanBoard, MemoryStorage, Storage, TaskPatch};

const STATUSES: [&str; 3] = ["todo", "in-progress", "done"];

#[derive(Debug, Clone)]
enum Op {
    Add(String, String, usize),
    Edit(usize, String, String),
    Move(usize, usize),
    Delete(usize),
    DeleteMissing,
}

fn text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("   ".to_string()),
        "[a-zA-Z0-9 <>&'\"]{1,12}",
    ]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (text(), text(), 0..3usize).prop_map(|(t, d, s)| Op::Add(t, d, s)),
        (any::<usize>(), text(), text()).prop_map(|(i, t, d)| Op::Edit(i, t, d)),
        (any::<usize>(), 0..3usize).prop_map(|(i, s)| Op::Move(i, s)),
        any::<usize>().prop_map(Op::Delete),
        Just(Op::DeleteMissing),
    ]
}

fn pick(board: &KanbanBoard, index: usize) -> Option<taskboard::TaskId> {
    if board.is_empty() {
        None
    } else {
        Some(board.tasks()[index % board.len()].id)
    }
}

proptest! {
    #[test]
    fn reload_reconstructs_identical_list(ops in prop::collection::vec(op(), 0..40)) {
        let storage = MemoryStorage::new();
        let mut board = KanbanBoard::load(Rc::new(storage.clone()));

        for op in ops {
            match op {
                Op::Add(title, description, status) => {
                    let before = board.len();
                    let added = board.add(&title, &description, STATUSES[status]);
                    prop_assert_eq!(added.is_some(), !title.trim().is_empty());
                    prop_assert_eq!(board.len(), before + usize::from(added.is_some()));
                }
                Op::Edit(index, title, description) => {
                    if let Some(id) = pick(&board, index) {
                        let previous = board.get(id).cloned().unwrap();
                        board.update(id, TaskPatch::text(title.clone(), description));
                        let task = board.get(id).unwrap();
                        prop_assert!(!task.title.is_empty());
                        if title.trim().is_empty() {
                            prop_assert_eq!(&task.title, &previous.title);
                        }
                    }
                }
                Op::Move(index, status) => {
                    if let Some(id) = pick(&board, index) {
                        board.set_status(id, STATUSES[status]);
                    }
                }
                Op::Delete(index) => {
                    if let Some(id) = pick(&board, index) {
                        prop_assert!(board.remove(id));
                        prop_assert!(board.get(id).is_none());
                    }
                }
                Op::DeleteMissing => {
                    let before = board.tasks().to_vec();
                    prop_assert!(!board.remove(taskboard::TaskId(-42)));
                    prop_assert_eq!(board.tasks(), &before[..]);
                }
            }

            let reloaded = KanbanBoard::load(Rc::new(storage.clone()));
            prop_assert_eq!(reloaded.tasks(), board.tasks());
        }

        let mut ids: Vec<_> = board.tasks().iter().map(|t| t.id).collect();
        ids.sort();
        ids.dedup();
        prop_assert_eq!(ids.len(), board.len());
    }
}

#[test]
fn null_slot_is_an_empty_board() {
    let storage = MemoryStorage::new();
    storage.set_item(TASKS_KEY, "null").unwrap();
    assert!(KanbanBoard::load(Rc::new(storage)).is_empty());
}
