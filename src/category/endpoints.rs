//! Route handlers for listing and creating categories.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    app_state::lock_connection,
    category::{Category, CategoryForm, create_category, get_all_categories},
    extract::Json,
};

/// The state needed for listing and creating categories.
#[derive(Debug, Clone)]
pub struct CategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// List all categories ordered by name.
pub async fn get_categories_endpoint(
    State(state): State<CategoryState>,
) -> Result<Json<Vec<Category>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_all_categories(&connection).map(Json)
}

/// Create a category, responds with the new category and 201 Created.
///
/// Responds with 409 Conflict if the name is already taken.
pub async fn create_category_endpoint(
    State(state): State<CategoryState>,
    Json(form): Json<CategoryForm>,
) -> Result<(StatusCode, Json<Category>), Error> {
    let name = form.validate()?;
    let connection = lock_connection(&state.db_connection)?;

    let category = create_category(name, &connection)?;
    tracing::debug!("created category {} ({})", category.name, category.id);

    Ok((StatusCode::CREATED, Json(category)))
}
