use serde::{Deserialize, Serialize};

use crate::schema::{Checker, Validate, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreRequest {
    pub name: String,
}

impl GenreRequest {
    pub fn new(name: impl Into<String>) -> GenreRequest {
        GenreRequest { name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

impl Validate for Genre {
    fn validate(&self) -> Result<(), ValidationError> {
        Checker::new("Genre")
            .range("id", self.id, Some(1), None)
            .length("name", &self.name, 1, Some(100))
            .finish()
    }
}
