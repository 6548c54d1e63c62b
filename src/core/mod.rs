pub mod config;
pub mod memory;
pub mod stats;
pub mod types;

#[cfg(test)]
mod tests;
