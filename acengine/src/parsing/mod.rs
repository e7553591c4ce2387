pub mod builder;
pub mod declaration;
