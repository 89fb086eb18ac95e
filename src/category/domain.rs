//! Category names and the category record.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{Error, database_id::DatabaseId};

/// Database identifier for a category.
pub type CategoryId = DatabaseId;

/// The trimmed, non-empty name of a category, e.g. "Supermercado".
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name from `name` with surrounding whitespace removed.
    ///
    /// # Errors
    ///
    /// Returns [Error::EmptyCategoryName] if nothing is left after trimming.
    pub fn new(name: &str) -> Result<Self, Error> {
        match name.trim() {
            "" => Err(Error::EmptyCategoryName),
            trimmed => Ok(Self(trimmed.to_owned())),
        }
    }

    /// Wrap a name that was validated before it was stored.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A category that expenses are classified under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
}

/// The body of a request to create a category.
#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    #[serde(default)]
    pub name: String,
}

impl CategoryForm {
    /// The name of the category to create.
    ///
    /// # Errors
    ///
    /// Returns [Error::EmptyCategoryName] if the name is missing or blank.
    pub fn validate(&self) -> Result<CategoryName, Error> {
        CategoryName::new(&self.name)
    }
}

#[cfg(test)]
mod category_name_tests {
    use serde_json::json;

    use crate::{
        Error,
        category::{CategoryForm, CategoryName},
    };

    #[test]
    fn new_fails_on_empty_string() {
        assert_eq!(CategoryName::new(""), Err(Error::EmptyCategoryName));
    }

    #[test]
    fn new_fails_on_just_whitespace() {
        assert_eq!(CategoryName::new("\n\t \r"), Err(Error::EmptyCategoryName));
    }

    #[test]
    fn new_trims_whitespace() {
        let name = CategoryName::new("  Almoço ");

        assert_eq!(name, Ok(CategoryName::new_unchecked("Almoço")));
    }

    #[test]
    fn serializes_as_plain_string() {
        let value = serde_json::to_value(CategoryName::new_unchecked("Luz")).unwrap();

        assert_eq!(value, json!("Luz"));
    }

    #[test]
    fn form_without_name_is_empty() {
        let form: CategoryForm = serde_json::from_value(json!({})).unwrap();

        assert_eq!(form.validate(), Err(Error::EmptyCategoryName));
    }
}
