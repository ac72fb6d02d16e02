//! Query modules, one per table family.

pub mod results;
pub mod runs;
