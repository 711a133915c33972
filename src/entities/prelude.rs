//! `SeaORM` Entity prelude

pub use super::categories::Entity as Categories;
pub use super::price_change_history::Entity as PriceChangeHistory;
pub use super::prices::Entity as Prices;
pub use super::products::Entity as Products;
