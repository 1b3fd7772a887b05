//! Physics-driven avatar locomotion with an occlusion-aware third-person
//! orbit camera.
//!
//! Two tick-driven subsystems over an external physics engine:
//!
//! - [`phys::Mover`] turns per-tick collision contacts, polled inputs and
//!   the rigid body's velocity into stable locomotion: slope-aware ground
//!   classification, ground snapping, acceleration-limited velocity
//!   steering and multi-jump budgeting. Runs once per fixed simulation
//!   tick.
//! - [`camera::Camera`] tracks the avatar through a lagged focus point,
//!   blends manual look input with automatic realignment behind the
//!   movement heading, and shortens its orbit distance with a box cast to
//!   avoid occluding geometry. Runs once per render tick on unscaled time.
//!
//! The only coupling runs camera → avatar: the mover maps move input
//! through [`Camera::input_frame`] with an accepted one-tick lag. The
//! physics engine is reached through [`collide::CollisionQuery`] and plain
//! value types; nothing here is shared across threads.

pub mod camera;
pub mod collide;
pub mod comp;
pub mod error;
pub mod phys;
pub mod settings;
pub mod util;

// Reexports
pub use crate::{
    camera::Camera,
    collide::{CollisionQuery, Contact, RayHit, Surface, SurfaceMask},
    comp::{ControllerInputs, LocomotionState, Pos, Vel},
    error::Error,
    phys::{InputFrame, Mover},
    settings::{CameraParams, CameraSettings, MoveParams, MoveSettings, Settings},
};
