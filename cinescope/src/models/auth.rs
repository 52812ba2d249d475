use serde::{Deserialize, Serialize};

use super::user::{Role, User};
use crate::schema::{Checker, Validate, ValidationError, EMAIL};

/// Body of `POST /register` and `POST /user`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub email: String,
    pub full_name: String,
    pub password: String,
    pub password_repeat: String,
    pub roles: Vec<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banned: Option<bool>,
}

impl UserData {
    pub fn login(&self) -> LoginRequest {
        LoginRequest {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

impl Validate for UserData {
    fn validate(&self) -> Result<(), ValidationError> {
        Checker::new("UserData")
            .contains("email", &self.email, "@")
            .length("fullName", &self.full_name, 1, Some(100))
            .length("password", &self.password, 8, None)
            .length("passwordRepeat", &self.password_repeat, 8, None)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> LoginRequest {
        LoginRequest {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Successful login. Extra keys such as `refreshToken` are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub user: LoggedInUser,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// Subset of [`User`] echoed back by `/login`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggedInUser {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub roles: Vec<Role>,
}

impl From<&User> for LoggedInUser {
    fn from(user: &User) -> Self {
        LoggedInUser {
            id: user.id.clone(),
            email: user.email.clone(),
            full_name: Some(user.full_name.clone()),
            roles: user.roles.clone(),
        }
    }
}

impl Validate for LoginResponse {
    fn validate(&self) -> Result<(), ValidationError> {
        Checker::new("LoginResponse")
            .rule("accessToken", !self.access_token.is_empty(), "token is empty")
            .pattern("user.email", &self.user.email, &EMAIL)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn user_data() -> UserData {
        UserData {
            email: "someone@gmail.com".into(),
            full_name: "Jane Doe".into(),
            password: "abc12345".into(),
            password_repeat: "abc12345".into(),
            roles: vec![Role::User],
            verified: None,
            banned: None,
        }
    }

    #[test]
    fn unset_flags_are_not_sent() {
        let body = serde_json::to_value(user_data()).unwrap();
        assert_eq!(
            body,
            json!({
                "email": "someone@gmail.com",
                "fullName": "Jane Doe",
                "password": "abc12345",
                "passwordRepeat": "abc12345",
                "roles": ["USER"]
            })
        );
    }

    #[test]
    fn short_password_violates_schema() {
        let data = UserData {
            password: "a1".into(),
            ..user_data()
        };
        assert_eq!(data.validate().unwrap_err().fields(), vec!["password"]);
    }

    #[test]
    fn login_response_ignores_unknown_keys() -> eyre::Result<()> {
        let res: LoginResponse = serde_json::from_value(json!({
            "accessToken": "eyJhbGciOi",
            "refreshToken": "r",
            "expiresIn": 1700000000,
            "user": {"id": "42", "email": "someone@gmail.com", "fullName": "Jane", "roles": ["USER"]}
        }))?;
        res.validate()?;
        assert_eq!(res.user.roles, vec![Role::User]);
        Ok(())
    }
}
