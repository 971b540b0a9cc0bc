// Assigner module: per-record brand scan and the rows it produces.

pub mod assignment;
pub mod pipeline;

pub use assignment::{assignment_id, build_assignment};
pub use pipeline::{Assigner, BrandAssigner};
