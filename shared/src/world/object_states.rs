use glam::{Quat, Vec3};

use super::staged_value::StagedValue;

// Changed-field mask bits, in canonical wire order
pub const STATE_POSITION: u32 = 0x01;
pub const STATE_ROTATION: u32 = 0x02;
pub const STATE_SCALE: u32 = 0x04;
pub const STATE_VISIBILITY: u32 = 0x08;
pub const STATE_ALL: u32 = STATE_POSITION | STATE_ROTATION | STATE_SCALE | STATE_VISIBILITY;

/// How a receiver applies one replicated field
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StateFieldDef {
    pub name: &'static str,
    pub mask: u32,
    /// Lerped fields are blended smoothly between two committed values over
    /// wall time; snap fields are applied atomically on receipt.
    pub lerped: bool,
}

/// Field definitions of [`ObjectStates`]. The interpolate/snap tag travels
/// with the definition, not per-instance, so receivers need no extra
/// metadata to decode how to apply a field. The two boolean fields share the
/// `STATE_VISIBILITY` mask bit (one snap-flag byte on the wire).
pub const OBJECT_STATE_FIELDS: [StateFieldDef; 5] = [
    StateFieldDef {
        name: "position",
        mask: STATE_POSITION,
        lerped: true,
    },
    StateFieldDef {
        name: "rotation",
        mask: STATE_ROTATION,
        lerped: true,
    },
    StateFieldDef {
        name: "scale",
        mask: STATE_SCALE,
        lerped: true,
    },
    StateFieldDef {
        name: "visibility",
        mask: STATE_VISIBILITY,
        lerped: false,
    },
    StateFieldDef {
        name: "running",
        mask: STATE_VISIBILITY,
        lerped: false,
    },
];

/// A committed-state snapshot of one object, restricted to the fields named
/// by `flags`. Unmasked fields hold don't-care values and must be ignored.
///
/// This is a plain value struct: it may be queued, copied across threads, or
/// byte-serialized without touching the sender's live objects.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StateUpdate {
    pub flags: u32,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub visibility: bool,
    pub running: bool,
}

impl StateUpdate {
    pub fn has(&self, mask: u32) -> bool {
        self.flags & mask != 0
    }
}

/// The replicated state bundle of one level object.
///
/// All fields commit as one logical unit: no external reader can observe a
/// partially-committed bundle.
#[derive(Clone, Debug)]
pub struct ObjectStates {
    pub position: StagedValue<Vec3>,
    pub rotation: StagedValue<Quat>,
    pub scale: StagedValue<Vec3>,
    pub visibility: StagedValue<bool>,
    pub running: StagedValue<bool>,
}

impl ObjectStates {
    /// Spawn defaults: origin, identity rotation, unit scale, visible, not
    /// running.
    pub fn new() -> Self {
        Self {
            position: StagedValue::new(Vec3::ZERO),
            rotation: StagedValue::new(Quat::IDENTITY),
            scale: StagedValue::new(Vec3::ONE),
            visibility: StagedValue::new(true),
            running: StagedValue::new(false),
        }
    }

    /// Mask of fields with a pending change
    pub fn changed_mask(&self) -> u32 {
        let mut mask = 0;
        if self.position.has_changed() {
            mask |= STATE_POSITION;
        }
        if self.rotation.has_changed() {
            mask |= STATE_ROTATION;
        }
        if self.scale.has_changed() {
            mask |= STATE_SCALE;
        }
        if self.visibility.has_changed() || self.running.has_changed() {
            mask |= STATE_VISIBILITY;
        }
        mask
    }

    /// Commits every pending field as one unit and returns the update
    /// carrying exactly the changed fields, or `None` when nothing was
    /// staged.
    pub fn commit_update(&mut self) -> Option<StateUpdate> {
        let flags = self.changed_mask();
        if flags == 0 {
            return None;
        }

        self.position.commit();
        self.rotation.commit();
        self.scale.commit();
        self.visibility.commit();
        self.running.commit();

        Some(self.update_with_flags(flags))
    }

    /// An update selecting every field: the authoritative full snapshot
    /// sent on spawn or join.
    pub fn full_update(&self) -> StateUpdate {
        self.update_with_flags(STATE_ALL)
    }

    /// Force-assigns exactly the fields selected by `update.flags`.
    /// Receiver side of [`commit_update`](ObjectStates::commit_update).
    pub fn apply_update(&mut self, update: &StateUpdate) {
        if update.has(STATE_POSITION) {
            self.position.force(update.position);
        }
        if update.has(STATE_ROTATION) {
            self.rotation.force(update.rotation);
        }
        if update.has(STATE_SCALE) {
            self.scale.force(update.scale);
        }
        if update.has(STATE_VISIBILITY) {
            self.visibility.force(update.visibility);
            self.running.force(update.running);
        }
    }

    fn update_with_flags(&self, flags: u32) -> StateUpdate {
        StateUpdate {
            flags,
            position: *self.position.get(),
            rotation: *self.rotation.get(),
            scale: *self.scale.get(),
            visibility: *self.visibility.get(),
            running: *self.running.get(),
        }
    }
}

impl Default for ObjectStates {
    fn default() -> Self {
        Self::new()
    }
}
