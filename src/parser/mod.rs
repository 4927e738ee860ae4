pub mod fields;
pub mod listings;
pub mod pagination;
pub mod prices;

pub use fields::{resolve_artist, resolve_support, resolve_venue};
pub use listings::harvest;
pub use pagination::{discover_page_count, resolve_page_count};
pub use prices::{AmountError, PriceParser};
