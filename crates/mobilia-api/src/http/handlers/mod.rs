//! Request handlers, grouped by surface.

pub mod assistant;
pub mod catalog;
pub mod search;
