//! Export of the discharge board.

mod discharged;

pub use discharged::*;
