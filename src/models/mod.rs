pub mod category;
pub mod pagination;
pub mod price;
pub mod product;
pub mod validation;
