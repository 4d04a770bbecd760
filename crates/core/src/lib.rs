#![forbid(unsafe_code)]

pub mod ability;
pub mod algebra;
pub mod engine;
pub mod model;
pub mod scoring;
pub mod selector;
pub mod time;

pub use engine::{Action, apply};
pub use time::Clock;
