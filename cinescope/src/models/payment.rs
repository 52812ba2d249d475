use serde::{Deserialize, Serialize};

use super::{id_string, opt_id_string};
use crate::schema::{Checker, Validate, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub card_number: String,
    pub card_holder: String,
    pub expiration_date: String,
    pub security_code: u16,
}

impl Card {
    /// Card the payment sandbox accepts as valid.
    pub fn test_card() -> Card {
        Card {
            card_number: "4242424240424242".into(),
            card_holder: "Test Account".into(),
            expiration_date: "12/28".into(),
            security_code: 123,
        }
    }
}

/// Body of `POST /create`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub movie_id: i64,
    pub amount: i64,
    pub card: Card,
}

impl Validate for PaymentRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        Checker::new("PaymentRequest")
            .range("movieId", self.movie_id, Some(1), None)
            .range("amount", self.amount, Some(1), None)
            .length("card.cardNumber", &self.card.card_number, 16, Some(16))
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Success,
    Pending,
    Failed,
    InvalidCard,
    Error,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCreated {
    pub status: PaymentStatus,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub id: Option<String>,
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub movie_id: Option<i64>,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Validate for PaymentCreated {
    fn validate(&self) -> Result<(), ValidationError> {
        Checker::new("PaymentCreated")
            .opt_range("amount", self.amount, Some(1), None)
            .iso8601("createdAt", self.created_at.as_deref())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: i64,
    pub status: PaymentStatus,
    pub amount: i64,
    pub total: i64,
    pub movie_id: i64,
    #[serde(deserialize_with = "id_string")]
    pub user_id: String,
    pub created_at: String,
}

impl Validate for Payment {
    fn validate(&self) -> Result<(), ValidationError> {
        Checker::new("Payment")
            .range("amount", self.amount, Some(1), None)
            .range("total", self.total, Some(1), None)
            .range("movieId", self.movie_id, Some(1), None)
            .iso8601("createdAt", Some(self.created_at.as_str()))
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentsPage {
    pub payments: Vec<Payment>,
    pub count: i64,
    pub page: i64,
    pub page_size: i64,
    pub page_count: i64,
}

impl Validate for PaymentsPage {
    fn validate(&self) -> Result<(), ValidationError> {
        self.payments
            .iter()
            .fold(Checker::new("PaymentsPage"), |checker, payment| checker.nested(payment))
            .range("count", self.count, Some(0), None)
            .range("page", self.page, Some(1), None)
            .range("pageSize", self.page_size, Some(1), None)
            .range("pageCount", self.page_count, Some(1), None)
            .finish()
    }
}

/// Query of `GET /find-all`. The payment service uses snake_case keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentsQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PaymentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}
