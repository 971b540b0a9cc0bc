pub mod catalog;
pub mod traits;

pub use catalog::CatalogSource;
pub use traits::RecordSource;
