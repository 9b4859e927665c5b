pub mod config;
pub mod project;
pub mod storage;
pub mod todo;
pub mod utils;
