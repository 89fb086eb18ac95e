use std::error::Error;

use clap::Parser;
use rusqlite::Connection;

use contas_rs::{CategoryName, create_category_if_missing, initialize_db};

/// The categories every new database starts with.
const DEFAULT_CATEGORIES: [&str; 9] = [
    "Gasolina",
    "Supermercado",
    "Almoço",
    "Cartão de Crédito",
    "Luz",
    "Água",
    "Condomínio",
    "Financiamento",
    "Outros",
];

/// A utility for creating the default expense categories in a contas_rs database.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database. It is created if it does not exist.
    #[arg(long, env = "DB_PATH")]
    db_path: String,
}

/// Create the default categories, skipping any that already exist.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    println!("Seeding database at {:#?}", args.db_path);
    let conn = Connection::open(&args.db_path)?;

    initialize_db(&conn)?;

    for name in DEFAULT_CATEGORIES {
        let name = CategoryName::new(name)?;

        if create_category_if_missing(&name, &conn)? {
            println!("Created category {name}");
        } else {
            println!("Category {name} already exists, skipping");
        }
    }

    println!("Success!");

    Ok(())
}
