use std::sync::Arc;
use async_trait::async_trait;

use crate::domain::entity::{ProductSales, Record};
use crate::domain::repository::{TableRepository, RepositoryError, FilterCondition, Page};
use crate::infrastructure::storage::{MemoryStorage, StorageError};

/// インメモリリポジトリの実装
pub struct MemoryTableRepository {
    storage: Arc<MemoryStorage>,
}

impl MemoryTableRepository {
    pub fn new(storage: Arc<MemoryStorage>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl TableRepository for MemoryTableRepository {
    async fn get_table_names(&self) -> Result<Vec<String>, RepositoryError> {
        Ok(self.storage.get_table_names())
    }

    async fn resolve_table(&self, segment: &str) -> Result<String, RepositoryError> {
        self.storage
            .resolve(segment)
            .map(str::to_string)
            .ok_or_else(|| RepositoryError::TableNotFound(segment.to_string()))
    }

    async fn select(
        &self,
        table_name: &str,
        filter: Option<FilterCondition>,
        page: Page,
    ) -> Result<Vec<Record>, RepositoryError> {
        self.storage
            .select_rows(table_name, filter.as_ref(), page)
            .map_err(RepositoryError::from)
    }

    async fn find_by_id(&self, table_name: &str, id: &str) -> Result<Record, RepositoryError> {
        let table = self.storage.get_table(table_name)?;

        // 複合キーのテーブルは単一IDでは引けない
        let column = table
            .get_primary_key()
            .ok_or_else(|| RepositoryError::CompositeKey(table_name.to_string()))?;

        self.storage
            .find_first(table_name, column, id)?
            .ok_or_else(|| RepositoryError::RecordNotFound {
                table: table_name.to_string(),
                id: id.to_string(),
            })
    }

    async fn order_details(&self, order_id: &str) -> Result<Vec<Record>, RepositoryError> {
        Ok(self.storage.order_details(order_id))
    }

    async fn orders_for_customer(&self, customer_id: &str) -> Result<Vec<Record>, RepositoryError> {
        Ok(self.storage.orders_for_customer(customer_id))
    }

    async fn orders_for_product(&self, product_id: &str) -> Result<Vec<Record>, RepositoryError> {
        Ok(self.storage.orders_for_product(product_id))
    }

    async fn sales_by_product(&self) -> Result<Vec<ProductSales>, RepositoryError> {
        Ok(self.storage.sales_by_product())
    }
}

impl From<StorageError> for RepositoryError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::TableNotFound(name) => RepositoryError::TableNotFound(name),
        }
    }
}
