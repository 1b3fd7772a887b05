//! User-facing configuration and the runtime parameters derived from it.
//!
//! Settings are plain serde values loaded from a RON file. They are never
//! read in the per-tick code; [`MoveSettings::params`] and
//! [`CameraSettings::params`] convert them once into immutable parameter
//! sets, eagerly turning degree thresholds into dot-product thresholds.
//! Invalid values are corrected by clamping (with a warning), not rejected.

use crate::{
    collide::{Surface, SurfaceMask},
    error::Error,
};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::warn;

/// `Settings` contains everything that can be configured in the
/// controller's settings.ron file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub movement: MoveSettings,
    pub camera: CameraSettings,
}

impl Settings {
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let file = fs::File::open(path)?;
        Ok(ron::de::from_reader(file)?)
    }

    /// Load settings, falling back to defaults if the file is missing or
    /// does not parse.
    pub fn load(path: &Path) -> Self {
        match Self::from_file(path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(?e, ?path, "Failed to load settings, using defaults");
                Self::default()
            },
        }
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), Error> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let ron = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        fs::write(path, ron.as_bytes())?;
        Ok(())
    }
}

/// Locomotion tunables. Angles are in degrees, speeds in units/second,
/// accelerations in units/second².
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveSettings {
    pub max_speed: f32,
    pub max_acceleration: f32,
    pub max_air_acceleration: f32,
    /// Height of the jump apex above the launch point.
    pub jump_height: f32,
    /// Extra jumps allowed while airborne.
    pub max_air_jumps: u32,
    /// Steepest slope that still counts as ground.
    pub max_ground_angle: f32,
    /// Steepest slope that still counts as ground on stairs-tagged surfaces.
    pub max_stairs_angle: f32,
    /// Above this speed the controller no longer snaps back to lost ground.
    pub max_snap_speed: f32,
    /// Length of the downward ground probe.
    pub probe_distance: f32,
    /// Surfaces the ground probe may hit.
    pub probe_mask: SurfaceMask,
}

impl Default for MoveSettings {
    fn default() -> Self {
        Self {
            max_speed: 10.0,
            max_acceleration: 10.0,
            max_air_acceleration: 1.0,
            jump_height: 2.0,
            max_air_jumps: 0,
            max_ground_angle: 25.0,
            max_stairs_angle: 50.0,
            max_snap_speed: 100.0,
            probe_distance: 1.0,
            probe_mask: SurfaceMask::GROUND.union(SurfaceMask::STAIRS),
        }
    }
}

impl MoveSettings {
    /// Derive the immutable per-tick parameters, clamping out-of-range
    /// values.
    pub fn params(&self) -> MoveParams {
        let ground_angle = clamped(self.max_ground_angle, 0.0..=89.0, "max_ground_angle");
        let stairs_angle = clamped(self.max_stairs_angle, 0.0..=89.0, "max_stairs_angle");
        MoveParams {
            max_speed: self.max_speed.max(0.0),
            max_accel: self.max_acceleration.max(0.0),
            max_air_accel: self.max_air_acceleration.max(0.0),
            jump_height: self.jump_height.max(0.0),
            max_air_jumps: self.max_air_jumps,
            min_ground_dot: ground_angle.to_radians().cos(),
            min_stairs_dot: stairs_angle.to_radians().cos(),
            max_snap_speed: self.max_snap_speed.max(0.0),
            probe_dist: self.probe_distance.max(0.0),
            probe_mask: self.probe_mask,
        }
    }
}

/// Camera tunables. Angles are in degrees.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Orbit distance from the focus point.
    pub distance: f32,
    /// The focus only moves once the target drifts this far from it.
    /// Zero follows the target rigidly.
    pub focus_radius: f32,
    /// Fraction of the remaining focus offset removed per second. Zero
    /// disables centering, leaving only the radius clamp.
    pub focus_centering: f32,
    /// Orbit speed, degrees/second, for both manual and automatic rotation.
    pub rotation_speed: f32,
    pub min_vertical_angle: f32,
    pub max_vertical_angle: f32,
    /// Idle time before the camera realigns behind the movement heading.
    /// Zero disables automatic alignment.
    pub align_delay: f32,
    /// Alignment eases in within this many degrees of the heading (and of
    /// its antipode, to avoid flip jitter).
    pub align_smooth_range: f32,
    /// Pull the camera in front of geometry that would occlude the focus.
    pub avoid_occlusion: bool,
    /// Vertical field of view of the rendering camera.
    pub fov: f32,
    pub aspect: f32,
    pub near_clip: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            distance: 5.0,
            focus_radius: 1.0,
            focus_centering: 0.5,
            rotation_speed: 90.0,
            min_vertical_angle: -30.0,
            max_vertical_angle: 60.0,
            align_delay: 5.0,
            align_smooth_range: 45.0,
            avoid_occlusion: true,
            fov: 60.0,
            aspect: 16.0 / 9.0,
            near_clip: 0.1,
        }
    }
}

impl CameraSettings {
    /// Derive the immutable per-tick parameters, clamping out-of-range
    /// values.
    pub fn params(&self) -> CameraParams {
        let min_vertical = clamped(self.min_vertical_angle, -89.0..=89.0, "min_vertical_angle");
        let mut max_vertical = clamped(self.max_vertical_angle, -89.0..=89.0, "max_vertical_angle");
        if max_vertical < min_vertical {
            warn!(
                min_vertical,
                max_vertical, "max_vertical_angle below min_vertical_angle, clamping"
            );
            max_vertical = min_vertical;
        }
        CameraParams {
            distance: self.distance.max(0.0),
            focus_radius: self.focus_radius.max(0.0),
            focus_centering: clamped(self.focus_centering, 0.0..=0.999, "focus_centering"),
            rotation_speed: self.rotation_speed.max(0.0),
            min_vertical,
            max_vertical,
            align_delay: self.align_delay.max(0.0),
            align_smooth_range: clamped(self.align_smooth_range, 1.0..=90.0, "align_smooth_range"),
            avoid_occlusion: self.avoid_occlusion,
            fov: clamped(self.fov, 1.0..=179.0, "fov"),
            aspect: self.aspect.max(0.01),
            near_clip: self.near_clip.max(0.001),
        }
    }
}

/// Movement parameters with angle thresholds pre-converted to dot products.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MoveParams {
    pub max_speed: f32,
    pub max_accel: f32,
    pub max_air_accel: f32,
    pub jump_height: f32,
    pub max_air_jumps: u32,
    pub min_ground_dot: f32,
    pub min_stairs_dot: f32,
    pub max_snap_speed: f32,
    pub probe_dist: f32,
    pub probe_mask: SurfaceMask,
}

impl MoveParams {
    /// Slope threshold for a contact on the given surface.
    pub fn min_dot(&self, surface: Surface) -> f32 {
        match surface {
            Surface::Stairs => self.min_stairs_dot,
            _ => self.min_ground_dot,
        }
    }
}

/// Camera parameters after validation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CameraParams {
    pub distance: f32,
    pub focus_radius: f32,
    pub focus_centering: f32,
    pub rotation_speed: f32,
    pub min_vertical: f32,
    pub max_vertical: f32,
    pub align_delay: f32,
    pub align_smooth_range: f32,
    pub avoid_occlusion: bool,
    pub fov: f32,
    pub aspect: f32,
    pub near_clip: f32,
}

fn clamped(value: f32, range: std::ops::RangeInclusive<f32>, name: &str) -> f32 {
    let corrected = value.clamp(*range.start(), *range.end());
    if corrected != value {
        warn!(name, value, corrected, "Out-of-range setting clamped");
    }
    corrected
}
