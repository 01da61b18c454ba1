//! Pure motion generators consumed by the site's animation runtime.
//!
//! Everything here is a function of explicit inputs (time, pointer position,
//! screen size, an rng); nothing reads a clock or a global.

pub mod figure8;
pub mod magnetic;
pub mod particles;
pub mod typing;

pub use figure8::PathPoint;
