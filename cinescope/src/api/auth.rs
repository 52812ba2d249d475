use crate::{
    http::{RequestBuilder, Requester},
    models::{LoginRequest, UserData},
    Error, Result,
};

/// `/register` and `/login` on the auth service.
#[derive(Debug, Clone, Copy)]
pub struct AuthApi<'a> {
    requester: Requester<'a>,
    login_status: u16,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(requester: Requester<'a>, login_status: u16) -> AuthApi<'a> {
        AuthApi {
            requester,
            login_status,
        }
    }

    pub fn register_user(&self, user: &UserData) -> RequestBuilder<'a> {
        self.requester.post("/register").json(user).expect_status(201u16)
    }

    /// Expects the deployment's configured login status.
    pub fn login_user(&self, credentials: &LoginRequest) -> RequestBuilder<'a> {
        self.requester
            .post("/login")
            .json(credentials)
            .expect_status(self.login_status)
    }

    /// Logs in and returns the `accessToken` of the response.
    pub async fn login_token(&self, credentials: &LoginRequest) -> Result<String> {
        let res = self.login_user(credentials).send().await?;
        res.parsed_body()
            .as_ref()
            .and_then(|body| body.get("accessToken"))
            .and_then(|token| token.as_str())
            .map(str::to_string)
            .ok_or(Error::MissingField("accessToken"))
    }
}

#[cfg(test)]
mod test {
    use crate::{
        api::{test::config_for, ApiManager},
        models::{LoginRequest, Role, User, UserData},
        Error,
    };
    use mockito::Matcher;
    use pretty_assertions::assert_eq;

    fn user_data() -> UserData {
        UserData {
            email: "kkkekab12cd34@gmail.com".into(),
            full_name: "Jane Doe".into(),
            password: "abc12345".into(),
            password_repeat: "abc12345".into(),
            roles: vec![Role::User],
            verified: None,
            banned: None,
        }
    }

    #[tokio::test]
    async fn register_expects_created() -> eyre::Result<()> {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("POST", "/register")
            .match_body(Matcher::Json(serde_json::to_value(user_data())?))
            .with_status(201)
            .with_body(r#"{"id":"u-1","email":"kkkekab12cd34@gmail.com","fullName":"Jane Doe","roles":["USER"],"verified":false}"#)
            .create_async()
            .await;

        let api = ApiManager::new(&config_for(&server.url()));
        let user: User = api.auth().register_user(&user_data()).send().await?.validated()?;

        m.assert_async().await;
        assert_eq!(user.roles, vec![Role::User]);
        Ok(())
    }

    #[tokio::test]
    async fn login_status_follows_configuration() -> eyre::Result<()> {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/login")
            .with_status(200)
            .with_body(r#"{"accessToken":"t"}"#)
            .create_async()
            .await;

        let mut config = config_for(&server.url());
        let creds = LoginRequest::new("a@b.ru", "abc12345");

        let err = ApiManager::new(&config).auth().login_token(&creds).await.unwrap_err();
        assert_eq!(err.to_string(), "Unexpected status code: 200. Expected: 201");

        config.login_status = 200;
        let token = ApiManager::new(&config).auth().login_token(&creds).await?;
        assert_eq!(token, "t");
        Ok(())
    }

    #[tokio::test]
    async fn missing_token_is_distinct_failure() -> eyre::Result<()> {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/login")
            .with_status(201)
            .with_body(r#"{"user":{"id":"1"}}"#)
            .create_async()
            .await;

        let mut api = ApiManager::new(&config_for(&server.url()));
        let err = api
            .authenticate(&LoginRequest::new("a@b.ru", "abc12345"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingField("accessToken")));
        assert!(!api.is_authenticated());
        Ok(())
    }

    #[tokio::test]
    async fn wrong_password_with_explicit_expectation() -> eyre::Result<()> {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/login")
            .with_status(401)
            .with_body(r#"{"message":"Неверный логин или пароль","error":"Unauthorized","statusCode":401}"#)
            .create_async()
            .await;

        let api = ApiManager::new(&config_for(&server.url()));
        let res = api
            .auth()
            .login_user(&LoginRequest::new("a@b.ru", "wrong"))
            .expect_status(401u16)
            .send()
            .await?;
        let body: crate::models::ApiErrorBody = res.validated()?;
        assert_eq!(body.error.as_deref(), Some("Unauthorized"));
        Ok(())
    }
}
