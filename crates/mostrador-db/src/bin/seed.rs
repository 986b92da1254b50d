//! # Seed Data Generator
//!
//! Populates the database with a demo café catalog and a couple of mesas.
//!
//! ## Usage
//! ```bash
//! # Seed ./mostrador_dev.db for the "demo" owner
//! cargo run -p mostrador-db --bin seed
//!
//! # Specify database path and owner
//! cargo run -p mostrador-db --bin seed -- --db ./data/mostrador.db --owner 4f1c...
//! ```
//!
//! Runs once per owner: if the owner already has products nothing is written.

use std::env;

use mostrador_core::{Money, NewProduct, Quantity, UnitOfMeasure};
use mostrador_db::{Database, DbConfig};

/// (name, description, price in cents, stock, unit). Stock is in units, or
/// in hundredths of a kilo for weighed products.
const CATALOG: &[(&str, &str, i64, i64, UnitOfMeasure)] = &[
    ("Cafe", "Espresso simple", 1200, 500, UnitOfMeasure::Unit),
    ("Cafe con leche", "Taza grande", 1500, 500, UnitOfMeasure::Unit),
    ("Cortado", "", 1300, 500, UnitOfMeasure::Unit),
    ("Te", "Hebras, varios sabores", 1000, 200, UnitOfMeasure::Unit),
    ("Medialuna", "Manteca o grasa", 450, 120, UnitOfMeasure::Unit),
    ("Tostado", "Jamon y queso", 2800, 40, UnitOfMeasure::Unit),
    ("Alfajor", "Maicena", 900, 60, UnitOfMeasure::Unit),
    ("Agua mineral", "500 ml", 1100, 48, UnitOfMeasure::Unit),
    ("Jugo de naranja", "Exprimido", 1800, 30, UnitOfMeasure::Unit),
    ("Queso cremoso", "Por kilo", 9800, 450, UnitOfMeasure::Kg),
    ("Jamon cocido", "Por kilo", 12500, 300, UnitOfMeasure::Kg),
    ("Pan de campo", "Por kilo", 3200, 800, UnitOfMeasure::Kg),
];

const MESAS: &[&str] = &["Mesa 1", "Mesa 2", "Mesa 3", "Barra"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./mostrador_dev.db");
    let mut owner = String::from("demo");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--owner" | "-o" => {
                if i + 1 < args.len() {
                    owner = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Mostrador Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>      Database file path (default: ./mostrador_dev.db)");
                println!("  -o, --owner <ID>     Owner to seed (default: demo)");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Mostrador Seed Data Generator");
    println!("=============================");
    println!("Database: {}", db_path);
    println!("Owner:    {}", owner);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count(&owner).await?;
    if existing > 0 {
        println!("⚠ Owner already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        return Ok(());
    }

    let mut created = 0;
    for (name, description, price_cents, stock, unit) in CATALOG {
        let stock = match unit {
            UnitOfMeasure::Unit => Quantity::from_units(*stock),
            UnitOfMeasure::Kg => Quantity::from_hundredths(*stock),
        };
        let input = NewProduct {
            name: name.to_string(),
            description: Some(description.to_string()),
            price: Money::from_cents(*price_cents),
            stock,
            unit: *unit,
        };

        match db.products().create(&owner, input).await {
            Ok(product) => {
                created += 1;
                println!("  + {:<18} {:>10}  stock {} {}", product.name, product.price(), stock, unit);
            }
            Err(e) => eprintln!("Failed to insert {}: {}", name, e),
        }
    }

    for label in MESAS {
        db.orders().create(&owner, label).await?;
    }

    println!();
    println!("✓ Created {} products and {} mesas", created, MESAS.len());

    db.close().await;
    Ok(())
}
