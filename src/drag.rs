use crate::task::TaskId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSource {
    pub id: TaskId,
    pub origin: usize,
}

/// Tracks the one card being dragged and the column under the pointer.
/// Both are cleared when the drag is dropped or ends.
#[derive(Debug, Clone, Default)]
pub struct DragCoordinator {
    source: Option<DragSource>,
    hover: Option<usize>,
}

impl DragCoordinator {
    pub fn start(&mut self, id: TaskId, origin: usize) {
        self.source = Some(DragSource { id, origin });
        self.hover = Some(origin);
    }

    pub fn source(&self) -> Option<DragSource> {
        self.source
    }

    pub fn is_dragging(&self) -> bool {
        self.source.is_some()
    }

    pub fn is_source(&self, id: TaskId) -> bool {
        self.source.is_some_and(|s| s.id == id)
    }

    pub fn hover(&self) -> Option<usize> {
        self.hover
    }

    pub fn over(&mut self, column: usize) {
        if self.source.is_some() {
            self.hover = Some(column);
        }
    }

    pub fn leave(&mut self) {
        self.hover = None;
    }

    /// Finishes the drag over `column`, yielding the dragged task.
    pub fn drop_on(&mut self, column: usize) -> Option<(TaskId, usize)> {
        let source = self.source.take();
        self.hover = None;
        source.map(|s| (s.id, column))
    }

    pub fn end(&mut self) {
        self.source = None;
        self.hover = None;
    }
}
