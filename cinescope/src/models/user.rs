use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::schema::{Checker, Validate, ValidationError, EMAIL};

/// Access level of an account.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    Admin,
    SuperAdmin,
}

/// Account as returned by `/register`, `/user` and `/user/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub roles: Vec<Role>,
    #[serde(default)]
    pub verified: Option<bool>,
    #[serde(default)]
    pub banned: Option<bool>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Validate for User {
    fn validate(&self) -> Result<(), ValidationError> {
        Checker::new("User")
            .rule("id", !self.id.is_empty(), "id is empty")
            .pattern("email", &self.email, &EMAIL)
            .length("fullName", &self.full_name, 1, Some(100))
            .iso8601("createdAt", self.created_at.as_deref())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersPage {
    pub users: Vec<User>,
    pub count: i64,
    pub page: i64,
    pub page_size: i64,
    #[serde(default)]
    pub page_count: Option<i64>,
}

impl Validate for UsersPage {
    fn validate(&self) -> Result<(), ValidationError> {
        self.users
            .iter()
            .fold(Checker::new("UsersPage"), |checker, user| checker.nested(user))
            .range("count", self.count, Some(0), None)
            .range("page", self.page, Some(1), None)
            .range("pageSize", self.page_size, Some(1), None)
            .finish()
    }
}

/// Query of `GET /user`, sent through [`UsersQuery::pairs`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsersQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub roles: Vec<Role>,
    pub created_at: Option<String>,
}

impl UsersQuery {
    /// Flattened key/value pairs; repeated `roles` become repeated keys.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(page_size) = self.page_size {
            pairs.push(("pageSize", page_size.to_string()));
        }
        pairs.extend(self.roles.iter().map(|role| ("roles", role.to_string())));
        if let Some(created_at) = &self.created_at {
            pairs.push(("createdAt", created_at.clone()));
        }
        pairs
    }
}

impl Validate for UsersQuery {
    fn validate(&self) -> Result<(), ValidationError> {
        Checker::new("UsersQuery")
            .opt_range("page", self.page, Some(1), None)
            .opt_range("pageSize", self.page_size, Some(1), Some(100))
            .finish()
    }
}

/// Body of `PATCH /user/{id}`. Only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<Role>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banned: Option<bool>,
}

impl UpdateUser {
    pub fn roles(roles: impl IntoIterator<Item = Role>) -> UpdateUser {
        UpdateUser {
            roles: Some(roles.into_iter().collect()),
            ..Default::default()
        }
    }
}
