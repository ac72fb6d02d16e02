//! Seams to external collaborators: sources, ground-motion models, result
//! sinks, plus cooperative cancellation.

pub mod cancellation;
pub mod gsim;
pub mod sink;
pub mod source;

pub use cancellation::{Cancellable, CancellationToken};
pub use gsim::{GroundMotionModel, RuptureContext};
pub use sink::{DisaggResultSink, MemorySink};
pub use source::SeismicSource;
