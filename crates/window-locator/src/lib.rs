//! Window Locator - find the mirror window through the OS scripting channel
//!
//! The same [`ScriptRunner`] also carries keystroke scripts for text entry.

mod error;
mod locator;
mod script;

pub use error::*;
pub use locator::*;
pub use script::*;
