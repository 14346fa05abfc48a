//! Command implementations.

pub mod catalog;
pub mod detect;
pub mod parse;

pub use self::catalog::execute_catalog;
pub use self::detect::execute_detect;
pub use self::parse::execute_parse;
