//! Domain models for the hospital desk.

mod admission;
mod discharge;
mod patient;
mod service;
mod timestamp;

pub use admission::*;
pub use discharge::*;
pub use patient::*;
pub use service::*;
pub use timestamp::*;
