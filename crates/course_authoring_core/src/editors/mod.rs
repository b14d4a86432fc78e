//! One module per wizard editor. Each extends `Course` with the mutations it
//! owns and exposes the gate predicate for its step.

pub mod banner;
pub mod basic_info;
pub mod chapters;
pub mod lessons;
pub mod quiz;
