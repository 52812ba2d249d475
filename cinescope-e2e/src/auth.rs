use cinescope::models::{ApiErrorBody, LoginRequest, LoginResponse, Role, User};
use tanu::{check, check_eq, eyre};

use crate::fixtures;

#[tanu::test]
async fn register_user() -> eyre::Result<()> {
    let mut fixtures = fixtures();
    let data = fixtures.test_user();

    let user: User = fixtures
        .unauthenticated()
        .auth()
        .register_user(&data)
        .send()
        .await?
        .validated()?;

    check!(!user.id.is_empty(), "registered user has no id");
    check_eq!(data.email, user.email);
    check!(user.roles.contains(&Role::User));

    let registered = cinescope::RegisteredUser { data, id: user.id };
    fixtures.clean_up_registered(&registered).await?;
    Ok(())
}

#[tanu::test]
async fn login_returns_token_and_profile() -> eyre::Result<()> {
    let mut fixtures = fixtures();
    let user = fixtures.registered_user().await?;

    let login: LoginResponse = fixtures
        .unauthenticated()
        .auth()
        .login_user(&user.data.login())
        .send()
        .await?
        .validated()?;

    check!(!login.access_token.is_empty());
    check_eq!(user.id, login.user.id);
    check_eq!(user.data.email, login.user.email);

    fixtures.clean_up_registered(&user).await?;
    Ok(())
}

#[tanu::test]
async fn login_with_wrong_password() -> eyre::Result<()> {
    let mut fixtures = fixtures();
    let user = fixtures.registered_user().await?;
    let wrong = LoginRequest::new(user.data.email.as_str(), "wrong-password1");

    let res = fixtures
        .unauthenticated()
        .auth()
        .login_user(&wrong)
        .expect_status(401u16)
        .send()
        .await?;
    let body: ApiErrorBody = res.validated()?;

    check!(
        res.text().contains("Unauthorized"),
        "error payload does not mention Unauthorized: {}",
        res.text()
    );
    check_eq!(Some(401), body.status_code);

    fixtures.clean_up_registered(&user).await?;
    Ok(())
}

#[tanu::test]
async fn login_with_unknown_email() -> eyre::Result<()> {
    let mut fixtures = fixtures();
    let data = fixtures.test_user();

    fixtures
        .unauthenticated()
        .auth()
        .login_user(&data.login())
        .expect_status(401u16)
        .send()
        .await?;
    Ok(())
}

#[tanu::test]
async fn register_with_mismatched_password_repeat() -> eyre::Result<()> {
    let mut fixtures = fixtures();
    let mut data = fixtures.test_user();
    data.password_repeat = format!("{}x", data.password);

    fixtures
        .unauthenticated()
        .auth()
        .register_user(&data)
        .expect_status(400u16)
        .send()
        .await?;
    Ok(())
}

#[tanu::test]
async fn register_twice_conflicts() -> eyre::Result<()> {
    let mut fixtures = fixtures();
    let user = fixtures.registered_user().await?;

    fixtures
        .unauthenticated()
        .auth()
        .register_user(&user.data)
        .expect_status(409u16)
        .send()
        .await?;

    fixtures.clean_up_registered(&user).await?;
    Ok(())
}
