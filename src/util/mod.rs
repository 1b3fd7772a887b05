pub mod angle;
mod dir;
mod projection;

// Reexports
pub use dir::Dir;
pub use projection::Projection;
