pub mod error;
pub mod pipeline;
pub mod shell;
pub mod switcher;
pub mod terminal;
pub mod tools;
pub mod version;

#[cfg(test)]
pub(crate) mod test_utils;
