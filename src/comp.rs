use vek::*;

// Position
#[derive(Copy, Clone, Default, Debug, PartialEq)]
pub struct Pos(pub Vec3<f32>);

// Velocity
#[derive(Copy, Clone, Default, Debug, PartialEq)]
pub struct Vel(pub Vec3<f32>);

/// Inputs polled once per fixed tick by the embedding loop.
#[derive(Copy, Clone, Default, Debug, PartialEq)]
pub struct ControllerInputs {
    /// 2-axis move vector. Clamped to unit magnitude on consumption.
    pub move_dir: Vec2<f32>,
    /// Edge-triggered jump request. Latched until the next tick consumes it.
    pub jump: bool,
}

/// Per-tick locomotion bookkeeping for an avatar body.
///
/// The contact accumulators (`ground_contacts`, `steep_contacts`,
/// `contact_normal`, `steep_normal`) are rebuilt from scratch every tick;
/// only the derived fields (`jump_phase`, the step counters and the latched
/// jump request) carry over. `contact_normal` is unit length whenever the
/// velocity or jump solver reads it, and defaults to the up axis while
/// airborne.
#[derive(Copy, Clone, Default, Debug, PartialEq)]
pub struct LocomotionState {
    pub desired_vel: Vec3<f32>,
    pub contact_normal: Vec3<f32>,
    pub steep_normal: Vec3<f32>,
    pub ground_contacts: u32,
    pub steep_contacts: u32,
    pub jump_phase: u32,
    pub steps_since_grounded: u32,
    pub steps_since_jump: u32,
    pub queued_jump: bool,
}

impl LocomotionState {
    pub fn on_ground(&self) -> bool { self.ground_contacts > 0 }

    pub fn on_steep(&self) -> bool { self.steep_contacts > 0 }

    pub(crate) fn clear_contacts(&mut self) {
        self.ground_contacts = 0;
        self.steep_contacts = 0;
        self.contact_normal = Vec3::zero();
        self.steep_normal = Vec3::zero();
    }
}
