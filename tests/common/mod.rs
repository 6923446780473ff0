//! Helpers for integration tests.

use std::io::Write;

use serde_json::json;
use tempfile::NamedTempFile;

use storefront_admin::repository::InMemoryRepository;

pub const STORE: &str = "fager";

/// Snapshot with a small catalogue, two orders and a category tree.
pub fn snapshot() -> serde_json::Value {
    json!({
        "stores": {
            STORE: {
                "categories": [
                    { "id": "c1", "name": "Food", "display_order": 1 },
                    { "id": "c2", "name": "Snacks", "parent_id": "c1", "display_order": 2 },
                    { "id": "c3", "name": "Candy", "parent_id": "gone", "display_order": "3" }
                ],
                "products": [
                    {
                        "id": "p1", "name": "Chips", "category": "Snacks",
                        "price": 20, "cost_price": 12, "discount": 10,
                        "stock": 3, "min_stock": 5, "total_sold": 40,
                        "images": ["https://cdn.example.com/chips.png"]
                    },
                    {
                        "id": "p2", "name": "Juice", "category": "Food",
                        "price": "15.5", "stock": 0
                    },
                    {
                        "id": "p3", "name": "Rice", "category": "Food",
                        "price": 30, "stock": 50, "is_active": false
                    }
                ],
                "orders": [
                    {
                        "id": "o1", "status": "pending", "total_price": 47,
                        "customer_name": "Mona",
                        "products": [
                            { "name": "Chips", "qty": 2, "price": 18 },
                            { "name": "Juice", "qty": 1, "price": 11 }
                        ]
                    },
                    { "id": "o2", "status": "completed", "total_price": 30, "customer_name": "Omar" }
                ]
            }
        }
    })
}

/// Snapshot written to a temporary file, kept alive alongside the repository.
pub struct TestStore {
    _file: NamedTempFile,
    repo: InMemoryRepository,
}

impl TestStore {
    pub fn new() -> Self {
        let mut file = NamedTempFile::new().expect("create snapshot file");
        file.write_all(snapshot().to_string().as_bytes())
            .expect("write snapshot");
        let repo = InMemoryRepository::from_json_file(file.path()).expect("load snapshot");
        TestStore { _file: file, repo }
    }

    pub fn repo(&self) -> InMemoryRepository {
        self.repo.clone()
    }
}
