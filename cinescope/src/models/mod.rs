//! Typed request and response bodies, camelCase on the wire.
//!
//! Request models skip `None` fields when serialized, so a partially filled
//! body only carries the keys that were set.

pub mod auth;
pub mod genre;
pub mod movie;
pub mod payment;
pub mod review;
pub mod user;

pub use auth::{LoginRequest, LoginResponse, UserData};
pub use genre::{Genre, GenreRequest};
pub use movie::{Location, Movie, MovieData, MovieFilter, MoviesPage, SortOrder};
pub use payment::{
    Card, Payment, PaymentCreated, PaymentRequest, PaymentStatus, PaymentsPage, PaymentsQuery,
};
pub use review::{Review, ReviewRequest};
pub use user::{Role, UpdateUser, User, UsersPage, UsersQuery};

use serde::{Deserialize, Deserializer, Serialize};

use crate::schema::{Checker, Validate, ValidationError};

/// Error payload returned by every service on 4xx/5xx.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<ErrorMessage>,
    #[serde(default)]
    pub status_code: Option<u16>,
}

/// Validation failures come back as a list, everything else as one string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorMessage {
    One(String),
    Many(Vec<String>),
}

impl ErrorMessage {
    pub fn lines(&self) -> Vec<&str> {
        match self {
            ErrorMessage::One(message) => vec![message.as_str()],
            ErrorMessage::Many(messages) => messages.iter().map(String::as_str).collect(),
        }
    }
}

impl Validate for ApiErrorBody {
    fn validate(&self) -> Result<(), ValidationError> {
        Checker::new("ApiErrorBody")
            .rule(
                "error",
                self.error.is_some() || self.message.is_some(),
                "neither error nor message present",
            )
            .opt_range("statusCode", self.status_code, Some(400), Some(599))
            .finish()
    }
}

/// User ids are UUID strings in most payloads but numeric in some review
/// listings.
pub(crate) fn id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }
    Ok(match Id::deserialize(deserializer)? {
        Id::Text(id) => id,
        Id::Number(id) => id.to_string(),
    })
}

pub(crate) fn opt_id_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    struct Wrapped(#[serde(deserialize_with = "id_string")] String);
    Ok(Option::<Wrapped>::deserialize(deserializer)?.map(|Wrapped(id)| id))
}
