//! Rule records and rule-file loading.

pub mod loader;
#[cfg(test)]
mod loader_test;
pub mod record;

pub use loader::*;
pub use record::*;
