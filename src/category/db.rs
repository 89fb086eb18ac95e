//! Database operations for categories.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    category::{Category, CategoryId, CategoryName},
};

/// Create a category and return it with its generated ID.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateCategoryName] if a category with the same name already exists,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_category(name: CategoryName, connection: &Connection) -> Result<Category, Error> {
    connection
        .execute("INSERT INTO category (name) VALUES (?1);", (name.as_ref(),))
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateCategoryName(name.to_string()),
            error => error.into(),
        })?;

    let id = connection.last_insert_rowid();

    Ok(Category { id, name })
}

/// Create a category unless one with the same name exists.
///
/// Returns `true` if a new category was created.
pub fn create_category_if_missing(
    name: &CategoryName,
    connection: &Connection,
) -> Result<bool, Error> {
    let rows_affected = connection.execute(
        "INSERT OR IGNORE INTO category (name) VALUES (?1);",
        (name.as_ref(),),
    )?;

    Ok(rows_affected != 0)
}

/// Retrieve all categories ordered alphabetically by name.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name FROM category ORDER BY name ASC;")?
        .query_map([], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Whether a category with `category_id` exists.
pub fn category_exists(category_id: CategoryId, connection: &Connection) -> Result<bool, Error> {
    connection
        .query_row(
            "SELECT EXISTS (SELECT 1 FROM category WHERE id = ?1)",
            [category_id],
            |row| row.get(0),
        )
        .map_err(Error::from)
}

/// Initialize the category table.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        );",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let name = CategoryName::new_unchecked(&raw_name);

    Ok(Category { id, name })
}

#[cfg(test)]
mod category_query_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        category::{CategoryName, category_exists, create_category, get_all_categories},
        db::initialize,
    };

    use super::create_category_if_missing;

    fn get_test_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");
        connection
    }

    #[test]
    fn create_category_succeeds() {
        let connection = get_test_db_connection();
        let name = CategoryName::new("Gasolina").unwrap();

        let category = create_category(name.clone(), &connection);

        let got_category = category.expect("Could not create category");
        assert!(got_category.id > 0);
        assert_eq!(got_category.name, name);
    }

    #[test]
    fn create_category_with_duplicate_name_is_rejected() {
        let connection = get_test_db_connection();
        let name = CategoryName::new_unchecked("Luz");
        create_category(name.clone(), &connection).expect("Could not create test category");

        let duplicate = create_category(name, &connection);

        assert_eq!(duplicate, Err(Error::DuplicateCategoryName("Luz".to_owned())));
        assert_eq!(get_all_categories(&connection).unwrap().len(), 1);
    }

    #[test]
    fn category_exists_finds_created_category() {
        let connection = get_test_db_connection();
        let inserted = create_category(CategoryName::new_unchecked("Água"), &connection)
            .expect("Could not create test category");

        assert_eq!(category_exists(inserted.id, &connection), Ok(true));
        assert_eq!(category_exists(inserted.id + 123, &connection), Ok(false));
    }

    #[test]
    fn get_all_categories_orders_by_name() {
        let connection = get_test_db_connection();
        for name in ["Supermercado", "Almoço", "Luz"] {
            create_category(CategoryName::new_unchecked(name), &connection)
                .expect("Could not create test category");
        }

        let names: Vec<String> = get_all_categories(&connection)
            .expect("Could not get all categories")
            .into_iter()
            .map(|category| category.name.to_string())
            .collect();

        assert_eq!(names, ["Almoço", "Luz", "Supermercado"]);
    }

    #[test]
    fn create_if_missing_skips_existing_names() {
        let connection = get_test_db_connection();
        let name = CategoryName::new_unchecked("Outros");

        let first = create_category_if_missing(&name, &connection);
        let second = create_category_if_missing(&name, &connection);

        assert_eq!(first, Ok(true));
        assert_eq!(second, Ok(false));
        assert_eq!(get_all_categories(&connection).unwrap().len(), 1);
    }
}
