//! Files written for the desktop widget.

pub mod graph;
pub mod vars;

pub use graph::GraphStyle;
