pub mod adr;
pub mod collection;
pub mod error;
pub mod io;
pub mod paths;
pub mod project;

pub use error::{AugxError, Result};
