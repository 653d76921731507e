//! # Seed Data Loader
//!
//! Writes the default catalog and sample quotes to a local store.
//!
//! ## Usage
//! ```bash
//! # Seed ./devis_dev.db (default)
//! cargo run -p devis-db --bin seed
//!
//! # Specify database path
//! cargo run -p devis-db --bin seed -- --db ./data/devis.db
//! ```
//!
//! A store that already holds papers is left untouched, exactly like
//! `POST /initialize`.

use std::env;

use devis_core::seed;
use devis_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./devis_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Devis Imprimeur Seed Loader");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./devis_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Devis Imprimeur Seed Loader");
    println!("==============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let data = seed::default_store_data();
    let papers = data.catalog.papers.len();
    let quotes = data.quotes.len();

    if db.store().initialize(data).await? {
        println!("✓ Wrote {} papers and {} sample quotes", papers, quotes);
    } else {
        println!("⚠ Store already holds papers");
        println!("  Skipping seed to keep existing data.");
        println!("  Delete the database file to reseed.");
    }

    db.close().await;
    Ok(())
}
