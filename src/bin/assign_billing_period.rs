use std::{error::Error, process::exit};

use clap::Parser;
use rusqlite::Connection;

use contas_rs::{assign_expenses_to_billing_period, get_billing_period_by_name, initialize_db};

/// A utility for attributing expenses to a billing period in a contas_rs database.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, env = "DB_PATH")]
    db_path: String,

    /// The name of the billing period to assign the expenses to, e.g. "SETEMBRO25".
    #[arg(long, short)]
    name: String,

    /// Leave expenses that already belong to a billing period alone.
    #[arg(long)]
    only_unassigned: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let conn = Connection::open(&args.db_path)?;
    initialize_db(&conn)?;

    let Some(period) = get_billing_period_by_name(&args.name, &conn)? else {
        eprintln!("Billing period \"{}\" not found.", args.name);
        exit(1);
    };

    let updated = assign_expenses_to_billing_period(period.id, args.only_unassigned, &conn)?;

    println!(
        "Assigned {updated} expense(s) to the billing period \"{}\".",
        period.name
    );

    Ok(())
}
