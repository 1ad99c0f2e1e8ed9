//! 一覧検索・結合・売上レポートのベンチマーク
//!
//! 注文数を変えながら、Northwind 形式の合成データで計測する。

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use northwind_api::domain::catalog::spec_for;
use northwind_api::domain::entity::{Record, Table, Value};
use northwind_api::domain::repository::{FilterCondition, Page};
use northwind_api::infrastructure::storage::MemoryStorage;

const PRODUCTS: i64 = 77;
const LINES_PER_ORDER: i64 = 3;

fn table(name: &str, rows: Vec<Record>) -> Table {
    let primary_key = spec_for(name).map(|spec| spec.primary_key()).expect("registered table");
    Table::new(name, primary_key, rows)
}

fn setup_storage(num_orders: i64) -> MemoryStorage {
    let products = (1..=PRODUCTS)
        .map(|id| {
            [
                ("ProductID", Value::Integer(id)),
                ("ProductName", Value::from(format!("Product {id}"))),
                ("SupplierID", Value::Integer(id % 29 + 1)),
                ("CategoryID", Value::Integer(id % 8 + 1)),
                ("UnitPrice", Value::Float(id as f64 * 1.25)),
            ]
            .into_iter()
            .collect::<Record>()
        })
        .collect();

    let orders = (0..num_orders)
        .map(|i| {
            [
                ("OrderID", Value::Integer(10248 + i)),
                ("CustomerID", Value::from(format!("C{:04}", i % 91))),
                ("ShipCountry", Value::from(if i % 3 == 0 { "France" } else { "Germany" })),
            ]
            .into_iter()
            .collect::<Record>()
        })
        .collect();

    let details = (0..num_orders)
        .flat_map(|i| {
            (0..LINES_PER_ORDER).map(move |line| {
                [
                    ("OrderID", Value::Integer(10248 + i)),
                    ("ProductID", Value::Integer((i * LINES_PER_ORDER + line) % PRODUCTS + 1)),
                    ("UnitPrice", Value::Float(12.5)),
                    ("Quantity", Value::Integer(line + 1)),
                    ("Discount", Value::Float(0.05)),
                ]
                .into_iter()
                .collect::<Record>()
            })
        })
        .collect();

    MemoryStorage::new(vec![
        table("Order_Details", details),
        table("Orders", orders),
        table("Products", products),
    ])
}

fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_rows");

    for num_orders in [100, 1_000, 10_000] {
        let storage = setup_storage(num_orders);
        let filter = FilterCondition::search("france");

        group.bench_with_input(BenchmarkId::new("search", num_orders), &storage, |b, storage| {
            b.iter(|| {
                let rows = storage
                    .select_rows("Orders", black_box(filter.as_ref()), Page::default())
                    .expect("select");
                black_box(rows)
            });
        });
    }

    group.finish();
}

fn bench_composites(c: &mut Criterion) {
    let mut group = c.benchmark_group("composites");

    for num_orders in [100, 1_000, 10_000] {
        let storage = setup_storage(num_orders);

        group.bench_with_input(BenchmarkId::new("order_details", num_orders), &storage, |b, storage| {
            b.iter(|| black_box(storage.order_details(black_box("10300"))));
        });

        group.bench_with_input(BenchmarkId::new("orders_for_product", num_orders), &storage, |b, storage| {
            b.iter(|| black_box(storage.orders_for_product(black_box("11"))));
        });

        group.bench_with_input(BenchmarkId::new("sales_by_product", num_orders), &storage, |b, storage| {
            b.iter(|| black_box(storage.sales_by_product()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_select, bench_composites);
criterion_main!(benches);
