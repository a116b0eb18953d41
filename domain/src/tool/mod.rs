//! Tool domain.
//!
//! - [`entities`] — risk tiers, tool definitions and tool calls
//! - [`registry::ToolRegistry`] — the ordered catalog advertised to the model
//! - [`traits::ToolValidator`] — argument checking against a definition
//! - [`value_objects`] — handler results and their text rendering

pub mod entities;
pub mod registry;
pub mod traits;
pub mod value_objects;
