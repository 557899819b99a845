pub mod adr;
pub mod collection;
pub mod project;
