/// A single replicated field with a committed value and a pending value.
///
/// Readers only ever observe the committed value; writers stage changes with
/// [`submit_change`](StagedValue::submit_change) and make them visible with
/// [`commit`](StagedValue::commit). Repeated submissions before a commit
/// overwrite each other (last write wins).
#[derive(Clone, Debug)]
pub struct StagedValue<T: Clone> {
    committed: T,
    pending: T,
    dirty: bool,
}

impl<T: Clone> StagedValue<T> {
    pub fn new(value: T) -> Self {
        Self {
            committed: value.clone(),
            pending: value,
            dirty: false,
        }
    }

    /// Returns the committed value. Pending state is never observable here.
    pub fn get(&self) -> &T {
        &self.committed
    }

    /// Unconditionally assigns the committed value and discards any pending
    /// change. Used for full, non-diffed assignment: on spawn, or when an
    /// authoritative full snapshot arrives.
    pub fn force(&mut self, value: T) {
        self.committed = value;
        self.dirty = false;
    }

    /// Stages a new value without affecting `get()`. Last write wins.
    pub fn submit_change(&mut self, value: T) {
        self.pending = value;
        self.dirty = true;
    }

    pub fn has_changed(&self) -> bool {
        self.dirty
    }

    /// Promotes the pending value to committed and returns the *previous*
    /// committed value, for diff/undo purposes. A commit with no pending
    /// change is a no-op that returns the current committed value.
    pub fn commit(&mut self) -> T {
        if !self.dirty {
            return self.committed.clone();
        }
        let previous = std::mem::replace(&mut self.committed, self.pending.clone());
        self.dirty = false;
        previous
    }
}
