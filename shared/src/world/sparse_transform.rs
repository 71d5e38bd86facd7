use glam::{Quat, Vec3};

use super::object_states::ObjectStates;

// Component presence bits
pub const TRANSFORM_TRANSLATION: u8 = 0x01;
pub const TRANSFORM_ROTATION: u8 = 0x02;
pub const TRANSFORM_SCALE: u8 = 0x04;

/// A bitmask-tagged delta over {translation, rotation, scale}.
///
/// Absent components are inert identity (zero translation, identity
/// rotation, unit scale factor), not zero. Scale composes multiplicatively:
/// a scale component is a factor, not an absolute size.
#[derive(Clone, Copy, Debug)]
pub struct SparseTransform {
    components: u8,
    translation: Vec3,
    rotation: Quat,
    scale: Vec3,
}

impl SparseTransform {
    pub fn new() -> Self {
        Self {
            components: 0,
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    pub fn components(&self) -> u8 {
        self.components
    }

    pub fn is_empty(&self) -> bool {
        self.components == 0
    }

    pub fn has_translation(&self) -> bool {
        self.components & TRANSFORM_TRANSLATION != 0
    }

    pub fn has_rotation(&self) -> bool {
        self.components & TRANSFORM_ROTATION != 0
    }

    pub fn has_scale(&self) -> bool {
        self.components & TRANSFORM_SCALE != 0
    }

    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    // Setters overwrite any staged component value; adders compose with it.

    pub fn set_translation(&mut self, translation: Vec3) {
        self.components |= TRANSFORM_TRANSLATION;
        self.translation = translation;
    }

    pub fn add_translation(&mut self, translation: Vec3) {
        self.components |= TRANSFORM_TRANSLATION;
        self.translation += translation;
    }

    pub fn set_rotation(&mut self, rotation: Quat) {
        self.components |= TRANSFORM_ROTATION;
        self.rotation = rotation;
    }

    pub fn add_rotation(&mut self, rotation: Quat) {
        self.components |= TRANSFORM_ROTATION;
        self.rotation = rotation * self.rotation;
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.components |= TRANSFORM_SCALE;
        self.scale = scale;
    }

    pub fn add_scale(&mut self, scale: Vec3) {
        self.components |= TRANSFORM_SCALE;
        self.scale *= scale;
    }

    /// Combines every component present in `other` onto this transform,
    /// using the component's composition law (never the reverse). Components
    /// absent in `other` are untouched.
    pub fn merge(&mut self, other: &SparseTransform) {
        if other.has_translation() {
            self.add_translation(other.translation);
        }
        if other.has_rotation() {
            self.add_rotation(other.rotation);
        }
        if other.has_scale() {
            self.add_scale(other.scale);
        }
    }

    /// The transform that undoes this one: `t.merge(t.invert())` restores
    /// the pre-transform state within floating-point tolerance. Presence
    /// bits are copied unchanged.
    pub fn invert(&self) -> SparseTransform {
        SparseTransform {
            components: self.components,
            translation: -self.translation,
            rotation: self.rotation.conjugate(),
            scale: self.scale.recip(),
        }
    }

    /// Mutates only the entity's present components, staging the composed
    /// values onto the committed ones. Commit the bundle between successive
    /// applications to the same object.
    pub fn apply_to(&self, states: &mut ObjectStates) {
        if self.has_translation() {
            states
                .position
                .submit_change(*states.position.get() + self.translation);
        }
        if self.has_rotation() {
            states
                .rotation
                .submit_change(self.rotation * *states.rotation.get());
        }
        if self.has_scale() {
            states.scale.submit_change(*states.scale.get() * self.scale);
        }
    }

    /// Compares effective (identity-filled) component values, so a transform
    /// that merged a delta and its inverse still matches one that never
    /// carried that component.
    pub fn approx_eq(&self, other: &SparseTransform, epsilon: f32) -> bool {
        self.translation.abs_diff_eq(other.translation, epsilon)
            && (self.rotation.abs_diff_eq(other.rotation, epsilon)
                || self.rotation.abs_diff_eq(-other.rotation, epsilon))
            && self.scale.abs_diff_eq(other.scale, epsilon)
    }
}

impl Default for SparseTransform {
    fn default() -> Self {
        Self::new()
    }
}
