//! Shared Protocol Definitions for the mirror control server
//!
//! Actions, replies, mapping geometry and the error taxonomy shared by the
//! dispatcher, the HTTP layer and the collaborator crates.

mod action;
mod de;
mod error;
mod input;
mod mapping;
mod result;

pub use action::*;
pub use error::*;
pub use input::*;
pub use mapping::*;
pub use result::*;
