//! Value types and the collaborator trait for collision queries.
//!
//! The crate does not integrate bodies or detect collisions itself; the
//! embedding physics engine delivers an ordered list of [`Contact`]s once
//! per fixed tick and answers synchronous ray/shape casts through
//! [`CollisionQuery`]. A `None` cast result is a normal outcome, not an
//! error, and is never logged as one.

use crate::util::Dir;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use vek::*;

/// Surface tag attached to collision geometry by the physics collaborator.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Surface {
    Ground,
    /// Stairs get a laxer slope threshold so their collision ramps count as
    /// walkable.
    Stairs,
    Other,
}

bitflags! {
    /// Layer filter for the downward ground probe.
    #[derive(Copy, Clone, Debug, Eq, PartialEq)]
    pub struct SurfaceMask: u8 {
        const GROUND = 0b001;
        const STAIRS = 0b010;
        const OTHER = 0b100;
    }
}

impl Surface {
    pub fn mask(self) -> SurfaceMask {
        match self {
            Surface::Ground => SurfaceMask::GROUND,
            Surface::Stairs => SurfaceMask::STAIRS,
            Surface::Other => SurfaceMask::OTHER,
        }
    }
}

impl Serialize for SurfaceMask {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bits())
    }
}

impl<'de> Deserialize<'de> for SurfaceMask {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::from_bits_truncate(u8::deserialize(deserializer)?))
    }
}

/// One collision contact delivered for the current tick. Not stored across
/// ticks.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Contact {
    pub normal: Dir,
    pub surface: Surface,
}

/// Result of a successful raycast.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RayHit {
    pub normal: Dir,
    pub dist: f32,
    pub surface: Surface,
}

/// Synchronous, side-effect-free collision queries answered by the physics
/// collaborator.
pub trait CollisionQuery {
    /// Cast a ray against surfaces matching `mask`. Returns the nearest hit
    /// within `max_dist`, if any.
    fn raycast(
        &self,
        origin: Vec3<f32>,
        dir: Dir,
        max_dist: f32,
        mask: SurfaceMask,
    ) -> Option<RayHit>;

    /// Sweep an oriented box along `dir` and return the hit distance, if
    /// any. `half_extents` are in the cast-local frame defined by `ori`
    /// (x = right, y = sweep direction, z = up).
    fn boxcast(
        &self,
        origin: Vec3<f32>,
        half_extents: Vec3<f32>,
        dir: Dir,
        ori: Quaternion<f32>,
        max_dist: f32,
    ) -> Option<f32>;
}
