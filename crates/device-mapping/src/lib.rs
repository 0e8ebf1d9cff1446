//! Device Mapping - mirror window geometry and coordinate transforms
//!
//! Infers which device a mirror window shows and maps that device's logical
//! coordinates onto the host display.

mod error;
mod geometry;
mod mapper;
mod profile;

pub use error::*;
pub use geometry::*;
pub use mapper::*;
pub use profile::*;
