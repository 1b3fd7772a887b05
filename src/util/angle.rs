//! Angle helpers in the degree domain.
//!
//! Orbit angles, alignment thresholds and rotation speeds are all configured
//! in degrees and stay in degrees until a pose is actually computed, so the
//! wrap/step arithmetic lives here rather than being scattered over the
//! camera code.

use vek::Vec2;

/// Wrap an angle into `[0, 360)`.
pub fn wrap_degrees(angle: f32) -> f32 { angle.rem_euclid(360.0) }

/// Signed shortest difference from `from` to `to`, in `(-180, 180]`.
pub fn delta_degrees(from: f32, to: f32) -> f32 {
    let delta = wrap_degrees(to - from);
    if delta > 180.0 { delta - 360.0 } else { delta }
}

/// Step `from` towards `to` along the shortest arc, moving at most
/// `max_delta` degrees. The result is not wrapped.
pub fn move_towards_degrees(from: f32, to: f32, max_delta: f32) -> f32 {
    let delta = delta_degrees(from, to);
    if delta.abs() <= max_delta {
        from + delta
    } else {
        from + max_delta.copysign(delta)
    }
}

/// Heading of a horizontal unit direction, in degrees in `[0, 360)`.
/// 0 = forward (+y), 90 = right (+x).
pub fn heading_degrees(dir: Vec2<f32>) -> f32 {
    let angle = dir.y.clamp(-1.0, 1.0).acos().to_degrees();
    if dir.x < 0.0 { 360.0 - angle } else { angle }
}
