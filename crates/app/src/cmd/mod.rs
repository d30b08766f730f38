pub mod collections;
pub mod export;
pub mod import;
pub mod settings;
