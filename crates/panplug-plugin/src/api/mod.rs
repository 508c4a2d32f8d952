//! Values that cross the host/script boundary.

pub mod context;
pub mod params;
