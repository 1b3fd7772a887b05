//! Avatar locomotion tick.
//!
//! Once per fixed simulation tick the embedding loop reads the rigid body's
//! velocity, hands it here together with this tick's contact list, and
//! writes the adjusted velocity back. The tick classifies contacts into
//! ground/steep/ignored, re-acquires lost ground (probe snap, then steep
//! corner promotion), steers the tangential velocity towards the desired
//! velocity under an acceleration limit, and finally resolves a latched
//! jump request against the multi-jump budget.
//!
//! The desired-velocity frame comes from the camera via [`InputFrame`], so
//! the avatar reads the camera's orientation with a one-tick lag and the
//! camera never reads avatar state beyond its position.

use crate::{
    collide::{CollisionQuery, Contact},
    comp::{ControllerInputs, LocomotionState, Pos, Vel},
    settings::MoveParams,
    util::{Dir, Projection},
};
use vek::*;

/// Contacts at most this far below horizontal still count as steep rather
/// than overhang.
const STEEP_DOT_MIN: f32 = -0.01;

/// Horizontal frame for mapping 2-axis move input into world space,
/// supplied by the camera (or identity when there is none).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct InputFrame {
    pub right: Dir,
    pub forward: Dir,
}

impl Default for InputFrame {
    fn default() -> Self {
        Self {
            right: Dir::right(),
            forward: Dir::forward(),
        }
    }
}

/// The locomotion controller: immutable parameters plus the single
/// locomotion state value, advanced by [`Mover::tick`].
#[derive(Clone, Debug)]
pub struct Mover {
    params: MoveParams,
    state: LocomotionState,
}

impl Mover {
    pub fn new(params: MoveParams) -> Self {
        Self {
            params,
            state: LocomotionState::default(),
        }
    }

    pub fn state(&self) -> &LocomotionState { &self.state }

    /// Consume this tick's polled inputs. The move vector is clamped to
    /// unit magnitude and mapped through `frame`; the jump request is
    /// latched until the next tick consumes it.
    pub fn apply_inputs(&mut self, inputs: &ControllerInputs, frame: &InputFrame) {
        let sq = inputs.move_dir.magnitude_squared();
        let move_dir = if sq > 1.0 {
            inputs.move_dir / sq.sqrt()
        } else {
            inputs.move_dir
        };
        self.state.desired_vel = (frame.right.to_vec() * move_dir.x
            + frame.forward.to_vec() * move_dir.y)
            * self.params.max_speed;
        self.state.queued_jump |= inputs.jump;
    }

    /// Advance one fixed simulation tick. `vel` is the rigid body's linear
    /// velocity; the caller writes it back afterwards. `gravity` may change
    /// between ticks.
    pub fn tick(
        &mut self,
        pos: Pos,
        vel: &mut Vel,
        contacts: &[Contact],
        world: &impl CollisionQuery,
        gravity: Vec3<f32>,
        dt: f32,
    ) {
        let up = Dir::from_unnormalized(-gravity).unwrap_or_else(Dir::up);
        update_state(&mut self.state, &self.params, pos, vel, contacts, world, up);
        adjust_velocity(&self.state, &self.params, vel, dt);
        // The request is consumed exactly once, granted or not.
        if self.state.queued_jump {
            self.state.queued_jump = false;
            jump(&mut self.state, &self.params, vel, up, gravity.magnitude());
        }
    }
}

/// Rebuild the contact classification for this tick and re-acquire ground
/// where possible.
fn update_state(
    state: &mut LocomotionState,
    params: &MoveParams,
    pos: Pos,
    vel: &mut Vel,
    contacts: &[Contact],
    world: &impl CollisionQuery,
    up: Dir,
) {
    state.clear_contacts();
    classify_contacts(state, params, up, contacts);

    state.steps_since_grounded = state.steps_since_grounded.saturating_add(1);
    state.steps_since_jump = state.steps_since_jump.saturating_add(1);

    if state.on_ground()
        || snap_to_ground(state, params, pos, vel, world, up)
        || check_steep_contacts(state, params, up)
    {
        state.steps_since_grounded = 0;
        // Only reset the jump budget once we have been grounded for more
        // than one tick since launching, so the launch tick itself cannot
        // re-grant an air jump.
        if state.steps_since_jump > 1 {
            state.jump_phase = 0;
        }
        if state.ground_contacts > 1 {
            state.contact_normal.normalize();
        }
    } else {
        state.contact_normal = up.to_vec();
    }
}

/// Classify each contact as ground, steep or ignored (overhang) by the
/// angle of its normal against the up axis.
fn classify_contacts(
    state: &mut LocomotionState,
    params: &MoveParams,
    up: Dir,
    contacts: &[Contact],
) {
    for contact in contacts {
        let up_dot = up.dot(*contact.normal);
        if up_dot >= params.min_dot(contact.surface) {
            state.ground_contacts += 1;
            state.contact_normal += contact.normal.to_vec();
        } else if up_dot > STEEP_DOT_MIN {
            state.steep_contacts += 1;
            state.steep_normal += contact.normal.to_vec();
        }
    }
}

/// Probe below the body and re-attach to a surface we only just left.
/// Returns whether a virtual ground contact was committed.
fn snap_to_ground(
    state: &mut LocomotionState,
    params: &MoveParams,
    pos: Pos,
    vel: &mut Vel,
    world: &impl CollisionQuery,
    up: Dir,
) -> bool {
    // Airborne for more than one tick, or still launching: leave it alone.
    if state.steps_since_grounded > 1 || state.steps_since_jump <= 2 {
        return false;
    }
    let speed = vel.0.magnitude();
    if speed > params.max_snap_speed {
        return false;
    }
    let Some(hit) = world.raycast(pos.0, -up, params.probe_dist, params.probe_mask) else {
        return false;
    };
    if up.dot(*hit.normal) < params.min_dot(hit.surface) {
        return false;
    }

    state.ground_contacts = 1;
    state.contact_normal = hit.normal.to_vec();
    // Remove the outward component picked up while leaving the slope, but
    // keep the speed.
    if vel.0.dot(*hit.normal) > 0.0 {
        if let Some(dir) = vel.0.rejected(&hit.normal).try_normalized() {
            vel.0 = dir * speed;
        }
    }
    true
}

/// Promote a near-vertical multi-wall corner to walkable ground: several
/// steep contacts can average out to a normal flat enough to stand on.
fn check_steep_contacts(state: &mut LocomotionState, params: &MoveParams, up: Dir) -> bool {
    if state.steep_contacts > 1 {
        if let Some(normal) = state.steep_normal.try_normalized() {
            state.steep_normal = normal;
            if up.dot(normal) >= params.min_ground_dot {
                state.ground_contacts = 1;
                state.contact_normal = normal;
                return true;
            }
        }
    }
    false
}

/// Steer the velocity components tangential to the contact plane towards
/// the desired velocity, limited by the applicable acceleration. The
/// component orthogonal to the plane (e.g. fall speed) is untouched.
fn adjust_velocity(state: &LocomotionState, params: &MoveParams, vel: &mut Vel, dt: f32) {
    let normal = state.contact_normal;
    let x_axis = Vec3::unit_x().rejected(&normal).normalized();
    let y_axis = Vec3::unit_y().rejected(&normal).normalized();

    let current_x = vel.0.dot(x_axis);
    let current_y = vel.0.dot(y_axis);

    let accel = if state.on_ground() {
        params.max_accel
    } else {
        params.max_air_accel
    };
    let max_delta = accel * dt;

    let new_x = move_towards(current_x, state.desired_vel.x, max_delta);
    let new_y = move_towards(current_y, state.desired_vel.y, max_delta);

    vel.0 += x_axis * (new_x - current_x) + y_axis * (new_y - current_y);
}

/// Resolve a jump request against the jump budget and apply the impulse.
fn jump(state: &mut LocomotionState, params: &MoveParams, vel: &mut Vel, up: Dir, gravity: f32) {
    let jump_direction = if state.on_ground() {
        state.contact_normal
    } else if state.on_steep() {
        // Jumping off a wall refills the air-jump budget.
        state.jump_phase = 0;
        state.steep_normal
    } else if params.max_air_jumps > 0 && state.jump_phase <= params.max_air_jumps {
        // Walking off a ledge leaves the phase at zero; count it as the
        // first jump so the air-jump budget is not double-granted.
        if state.jump_phase == 0 {
            state.jump_phase = 1;
        }
        state.contact_normal
    } else {
        return;
    };

    state.steps_since_jump = 0;
    state.jump_phase += 1;

    // Bias the jump upward so wall jumps are not purely outward.
    let Some(dir) = Dir::from_unnormalized(jump_direction + up.to_vec()) else {
        return;
    };
    let mut jump_speed = (2.0 * gravity * params.jump_height).sqrt();
    let aligned_speed = vel.0.dot(*dir);
    // Chained jumps must not accelerate superlinearly along the jump axis.
    if aligned_speed > 0.0 {
        jump_speed = (jump_speed - aligned_speed).max(0.0);
    }
    vel.0 += *dir * jump_speed;
}

fn move_towards(from: f32, to: f32, max_delta: f32) -> f32 {
    if (to - from).abs() <= max_delta {
        to
    } else {
        from + max_delta.copysign(to - from)
    }
}
