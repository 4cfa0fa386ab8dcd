pub mod filter;
pub mod slots;

pub use filter::{FilterCriteria, FilterEngine, PriceBrackets, PriceRange};
pub use slots::{CatalogError, SlotCatalog};
