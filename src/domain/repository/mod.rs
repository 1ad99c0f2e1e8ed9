pub mod table_repository;

pub use table_repository::{
    TableRepository, RepositoryError,
    FilterCondition, Page
};

#[cfg(test)]
pub use table_repository::MockTableRepository;
