//! Third-person orbit camera.
//!
//! Runs on the render tick with an unscaled delta, so simulation pausing or
//! slow-motion does not change how the focus point settles. The camera only
//! ever reads the avatar's position; the avatar reads the camera's
//! orientation (through [`Camera::input_frame`]) with a one-tick lag.

use crate::{
    collide::CollisionQuery,
    phys::InputFrame,
    settings::CameraParams,
    util::{angle, Dir},
};
use vek::*;

/// Below this input magnitude per axis, look input is treated as noise.
const INPUT_EPSILON: f32 = 0.001;

/// Squared horizontal focus displacement below which automatic alignment
/// does not bother turning.
const ALIGN_MIN_MOVE_SQ: f32 = 1e-4;

pub struct Camera {
    params: CameraParams,
    focus: Vec3<f32>,
    prev_focus: Vec3<f32>,
    /// Orbit angles in degrees. Pitch is positive looking down and stays in
    /// `[min_vertical, max_vertical]`; yaw stays in `[0, 360)`.
    pitch: f32,
    yaw: f32,
    last_manual_input: f64,
}

impl Camera {
    pub fn new(params: CameraParams, target: Vec3<f32>) -> Self {
        let mut camera = Self {
            params,
            focus: target,
            prev_focus: target,
            pitch: 45.0,
            yaw: 0.0,
            last_manual_input: f64::NEG_INFINITY,
        };
        camera.constrain_angles();
        camera
    }

    pub fn focus(&self) -> Vec3<f32> { self.focus }

    pub fn pitch(&self) -> f32 { self.pitch }

    pub fn yaw(&self) -> f32 { self.yaw }

    pub fn set_aspect_ratio(&mut self, aspect: f32) { self.params.aspect = aspect.max(0.01); }

    /// Snap the focus to `target`, clearing the smoothing history. For
    /// spawns and teleports.
    pub fn reset_focus(&mut self, target: Vec3<f32>) {
        self.focus = target;
        self.prev_focus = target;
    }

    /// Advance one render tick and produce the camera pose. `time` and `dt`
    /// are unscaled wall-clock seconds.
    pub fn update(
        &mut self,
        target: Vec3<f32>,
        look_input: Vec2<f32>,
        time: f64,
        dt: f32,
        world: &impl CollisionQuery,
    ) -> (Vec3<f32>, Quaternion<f32>) {
        self.update_focus(target, dt);
        if self.manual_rotation(look_input, time, dt) || self.automatic_rotation(time, dt) {
            self.constrain_angles();
        }

        let look_dir = self.look_dir();
        let ori = self.ori();
        let dist = if self.params.avoid_occlusion {
            world
                .boxcast(
                    self.focus,
                    self.cast_half_extents(),
                    -look_dir,
                    ori,
                    self.params.distance,
                )
                .unwrap_or(self.params.distance)
        } else {
            self.params.distance
        };
        (self.focus - *look_dir * dist, ori)
    }

    /// Direction the camera looks along, from the current orbit angles.
    pub fn look_dir(&self) -> Dir {
        let pitch = self.pitch.to_radians();
        let yaw = self.yaw.to_radians();
        Dir::new(Vec3::new(
            yaw.sin() * pitch.cos(),
            yaw.cos() * pitch.cos(),
            -pitch.sin(),
        ))
    }

    /// Camera orientation as a quaternion (local forward is +y).
    pub fn ori(&self) -> Quaternion<f32> {
        Quaternion::rotation_z(-self.yaw.to_radians())
            * Quaternion::rotation_x(-self.pitch.to_radians())
    }

    /// Horizontal frame for mapping the avatar's move input: the look
    /// direction flattened to the ground plane, plus its right-hand
    /// perpendicular.
    pub fn input_frame(&self) -> InputFrame {
        let forward = self.look_dir().to_horizontal().unwrap_or_else(Dir::forward);
        let right = Dir::new(Vec3::new(forward.y, -forward.x, 0.0));
        InputFrame { right, forward }
    }

    /// Move the focus towards `target` with constant-fraction exponential
    /// decay, hard-clamped so it never lags more than `focus_radius` behind.
    fn update_focus(&mut self, target: Vec3<f32>, dt: f32) {
        self.prev_focus = self.focus;
        if self.params.focus_radius > 0.0 {
            let dist = target.distance(self.focus);
            let mut t = 1.0;
            if dist > 0.01 && self.params.focus_centering > 0.0 {
                t = (1.0 - self.params.focus_centering).powf(dt);
            }
            if dist > self.params.focus_radius {
                t = t.min(self.params.focus_radius / dist);
            }
            self.focus = Lerp::lerp(target, self.focus, t);
        } else {
            self.focus = target;
        }
    }

    /// Apply look input to the orbit angles. Input x turns the yaw, input y
    /// the pitch. Returns whether the angles changed.
    fn manual_rotation(&mut self, input: Vec2<f32>, time: f64, dt: f32) -> bool {
        if input.x.abs() > INPUT_EPSILON || input.y.abs() > INPUT_EPSILON {
            self.yaw += self.params.rotation_speed * dt * input.x;
            self.pitch += self.params.rotation_speed * dt * input.y;
            self.last_manual_input = time;
            true
        } else {
            false
        }
    }

    /// Realign the yaw behind the focus movement heading once manual input
    /// has been idle for `align_delay`. The turn rate is gated by movement
    /// speed and eased in near the heading and near its antipode.
    fn automatic_rotation(&mut self, time: f64, dt: f32) -> bool {
        if self.params.align_delay <= 0.0 {
            return false;
        }
        if time - self.last_manual_input < f64::from(self.params.align_delay) {
            return false;
        }
        let movement = (self.focus - self.prev_focus).xy();
        let movement_delta_sq = movement.magnitude_squared();
        if movement_delta_sq < ALIGN_MIN_MOVE_SQ {
            return false;
        }

        let heading = angle::heading_degrees(movement / movement_delta_sq.sqrt());
        let delta_abs = angle::delta_degrees(self.yaw, heading).abs();
        let mut rotation_change = self.params.rotation_speed * dt.min(movement_delta_sq);
        if delta_abs < self.params.align_smooth_range {
            rotation_change *= delta_abs / self.params.align_smooth_range;
        } else if 180.0 - delta_abs < self.params.align_smooth_range {
            rotation_change *= (180.0 - delta_abs) / self.params.align_smooth_range;
        }
        self.yaw = angle::move_towards_degrees(self.yaw, heading, rotation_change);
        true
    }

    fn constrain_angles(&mut self) {
        self.pitch = self
            .pitch
            .clamp(self.params.min_vertical, self.params.max_vertical);
        self.yaw = angle::wrap_degrees(self.yaw);
    }

    /// Half extents of the occlusion probe, sized so the box just covers
    /// the near plane of the rendering camera.
    fn cast_half_extents(&self) -> Vec3<f32> {
        let half_height = self.params.near_clip * (0.5 * self.params.fov.to_radians()).tan();
        Vec3::new(half_height * self.params.aspect, 0.0, half_height)
    }
}
