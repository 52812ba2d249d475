use cinescope::{
    models::{Role, UpdateUser, User, UsersPage, UsersQuery},
    Cleanup,
};
use tanu::{check, check_eq, eyre};

use crate::{fixtures, super_admin};

#[tanu::test]
async fn create_fetch_patch_delete_user() -> eyre::Result<()> {
    let mut fixtures = fixtures();
    let users = super_admin().await?.api.user();
    let data = fixtures.creation_user_data();

    let created: User = users.create_user(&data).send().await?.validated()?;
    check_eq!(data.email, created.email);
    check_eq!(Some(true), created.verified);

    let by_email: User = users.get_user(&data.email).send().await?.validated()?;
    let by_id: User = users.get_user(&created.id).send().await?.validated()?;
    check_eq!(by_email, by_id);

    let patched: User = users
        .patch_user(&created.id, &UpdateUser::roles([Role::Admin]))
        .send()
        .await?
        .validated()?;
    check_eq!(vec![Role::Admin], patched.roles);

    check_eq!(Cleanup::Deleted, users.clean_up_user(&created.id).await?);
    check_eq!(Cleanup::AlreadyGone, users.clean_up_user(&created.id).await?);
    Ok(())
}

#[tanu::test]
async fn list_users_by_role() -> eyre::Result<()> {
    let query = UsersQuery {
        page: Some(1),
        page_size: Some(20),
        roles: vec![Role::User],
        ..UsersQuery::default()
    };
    let page: UsersPage = super_admin()
        .await?
        .api
        .user()
        .get_users(&query)
        .send()
        .await?
        .validated()?;

    check!(page.users.len() <= 20, "page holds {} users", page.users.len());
    check!(
        page.users.iter().all(|user| user.roles.contains(&Role::User)),
        "listing contains users without the USER role"
    );
    Ok(())
}

#[tanu::test]
async fn invalid_user_listing_parameters() -> eyre::Result<()> {
    let users = super_admin().await?.api.user();

    users
        .get_users(&UsersQuery::default())
        .query(&[("pageSize", "-1")])
        .expect_status(400u16)
        .send()
        .await?;
    users
        .get_users(&UsersQuery::default())
        .query(&[("page", "-1")])
        .expect_status(400u16)
        .send()
        .await?;
    users
        .get_users(&UsersQuery::default())
        .query(&[("roles", "INVALID_ROLE")])
        .expect_status([400u16, 500])
        .send()
        .await?;
    Ok(())
}

#[tanu::test]
async fn common_user_cannot_read_user_records() -> eyre::Result<()> {
    let mut fixtures = fixtures();
    let user = fixtures.common_user(super_admin().await?).await?;

    let outcome = async {
        user.api
            .user()
            .get_user(&user.email)
            .expect_status(403u16)
            .send()
            .await?;
        eyre::Ok(())
    }
    .await;
    user.teardown_after(outcome).await
}

#[tanu::test]
async fn actors_hold_separate_sessions() -> eyre::Result<()> {
    let mut fixtures = fixtures();
    let root = super_admin().await?;
    let first = fixtures.common_user(root).await?;
    let second = match fixtures.admin(root).await {
        Ok(second) => second,
        Err(e) => return first.teardown_after(Err(e.into())).await,
    };

    let token = |actor: &cinescope::Actor| {
        actor
            .api
            .session()
            .headers()
            .get("authorization")
            .cloned()
    };
    let outcome = async {
        check!(token(&first).is_some());
        check!(token(&first) != token(&second), "actors share a bearer token");
        check!(token(&first) != token(root), "actor shares the super admin token");
        eyre::Ok(())
    }
    .await;
    let outcome = first.teardown_after(outcome).await;
    let second = second.teardown_after(eyre::Ok(())).await;
    outcome.and(second)
}
