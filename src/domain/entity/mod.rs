pub mod data_type;
pub mod value;
pub mod record;
pub mod table;
pub mod report;
// src/domain/entity/mod.rs

pub use data_type::DataType;
pub use value::Value;
pub use record::Record;
pub use table::{Table, PrimaryKey};
pub use report::ProductSales;
