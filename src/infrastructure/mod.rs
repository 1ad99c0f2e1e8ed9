pub mod loader;
pub mod storage;
pub mod repository;
