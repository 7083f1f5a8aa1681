use std::path::Path;

use log::*;
use sqlx::{migrate::MigrateDatabase, Sqlite};

use crate::{
    db_types::{NewProduct, Product},
    SqliteDatabase,
};
use kirana_common::Money;

/// Sets up logging and a fresh database at `url`. Any existing database at that path is dropped.
pub async fn prepare_test_env(url: &str) {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    debug!("🚀️ Logging initialised");
    create_database(url).await;
}

pub fn random_db_path() -> String {
    format!("sqlite://../data/test_kirana_{}.db", rand::random::<u64>())
}

pub async fn create_database<P: AsRef<Path>>(path: P) {
    let p = path.as_ref().as_os_str().to_str().unwrap();
    if let Err(e) = Sqlite::drop_database(p).await {
        warn!("Error dropping database {p}: {e:?}");
    }
    Sqlite::create_database(p).await.expect("Error creating database");
    info!("Created Sqlite database {p}");
}

/// Seeds a small catalog with known prices and stock levels. Returns the products in insertion order:
/// rice (stock 10), oil (stock 5), tea (stock 0).
pub async fn seed_products(db: &SqliteDatabase) -> Vec<Product> {
    let catalog = [
        ("Basmati Rice 5kg", "Long grain aged basmati", Money::from_rupees(1_200), 10),
        ("Sunflower Oil 1L", "Cold pressed sunflower oil", Money::from_rupees(350), 5),
        ("Ilam Tea 500g", "Loose leaf black tea from Ilam", Money::from_rupees(499), 0),
    ];
    let mut products = Vec::with_capacity(catalog.len());
    for (title, desc, price, stock) in catalog {
        let product = NewProduct {
            title: title.to_string(),
            short_description: desc.to_string(),
            price,
            stock,
        };
        products.push(db.insert_product(product).await.expect("Error seeding product"));
    }
    products
}
