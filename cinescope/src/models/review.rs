use serde::{Deserialize, Serialize};

use super::id_string;
use crate::schema::{Checker, Validate, ValidationError};

/// Body of `POST` and `PUT /movies/{id}/reviews`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub rating: u8,
    pub text: String,
}

impl Validate for ReviewRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        Checker::new("ReviewRequest")
            .range("rating", self.rating, Some(1), Some(5))
            .length("text", &self.text, 1, None)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewAuthor {
    #[serde(default)]
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(deserialize_with = "id_string")]
    pub user_id: String,
    #[serde(default)]
    pub movie_id: Option<i64>,
    pub rating: u8,
    pub text: String,
    #[serde(default, alias = "isHidden")]
    pub hidden: Option<bool>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub user: Option<ReviewAuthor>,
}

impl Validate for Review {
    fn validate(&self) -> Result<(), ValidationError> {
        Checker::new("Review")
            .rule("userId", !self.user_id.is_empty(), "userId is empty")
            .range("rating", self.rating, Some(1), Some(5))
            .iso8601("createdAt", self.created_at.as_deref())
            .iso8601("updatedAt", self.updated_at.as_deref())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn numeric_and_uuid_user_ids() -> eyre::Result<()> {
        let listed: Review = serde_json::from_value(json!({
            "userId": 17, "rating": 4, "text": "Хорошо", "isHidden": false
        }))?;
        let created: Review = serde_json::from_value(json!({
            "userId": "0b3f6d7c-5c43-4e4c-9a7d-9c1f1f1f1f1f",
            "rating": 5,
            "text": "Отлично",
            "createdAt": "2025-03-08T12:00:00.000Z",
            "user": {"fullName": "Jane Doe"}
        }))?;

        assert_eq!(listed.user_id, "17");
        assert_eq!(listed.hidden, Some(false));
        created.validate()?;
        assert_eq!(created.user.unwrap().full_name.as_deref(), Some("Jane Doe"));
        Ok(())
    }

    #[test]
    fn rating_outside_one_to_five() {
        let request = ReviewRequest {
            rating: 6,
            text: "too good".into(),
        };
        assert_eq!(request.validate().unwrap_err().fields(), vec!["rating"]);
    }
}
