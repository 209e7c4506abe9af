pub mod assembler;
pub mod audio;
pub mod compositor;
pub mod config;
pub mod error;
pub mod manifest;
pub mod metadata;
pub mod schema;
pub mod timing;
