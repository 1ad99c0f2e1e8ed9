pub mod entity;
pub mod catalog;
pub mod resolver;
pub mod repository;
