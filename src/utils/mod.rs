//! Utility modules shared by the library and the binary

pub mod logger;
pub mod progress;

#[cfg(test)]
mod tests;
