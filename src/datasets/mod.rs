pub mod decoder;
pub mod error;
pub mod loader;
pub mod normalizer;
