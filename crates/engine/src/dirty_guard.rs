/// Tracks whether the checkout form holds edits made since it was last reset.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DirtyGuard {
    dirty: bool,
}

impl DirtyGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an input-change event. Returns `true` when this call moved the
    /// form from clean to dirty.
    pub fn mark_dirty(&mut self) -> bool {
        let was_dirty = self.dirty;
        self.dirty = true;
        !was_dirty
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear(&mut self) {
        self.dirty = false;
    }
}
