//! Hook point definitions.

pub mod definitions;

pub use definitions::HookPoint;
