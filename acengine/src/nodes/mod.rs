pub mod circuit;
pub mod node;
pub mod product;
