pub mod decision;
pub mod product;
