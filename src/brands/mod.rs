// Brand synonym graph and its transitive closure.

pub mod flatten;
pub mod graph;

pub use flatten::{EquivalenceClasses, flatten};
pub use graph::BrandGraph;
