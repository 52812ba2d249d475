use cinescope::{models::Genre, Cleanup, Role};
use tanu::{check, check_eq, eyre};

use crate::{create_genre, fixtures, remove_genre, super_admin};

#[tanu::test]
async fn super_admin_creates_genre_readable_by_anyone() -> eyre::Result<()> {
    let mut fixtures = fixtures();
    let root = super_admin().await?;
    let request = fixtures.data().genre();

    let created: Genre = root
        .api
        .genres()
        .create_genre(&request)
        .send()
        .await?
        .validated()?;
    check_eq!(request.name, created.name);

    let fetched: Genre = fixtures
        .unauthenticated()
        .genres()
        .get_genre(created.id)
        .send()
        .await?
        .validated()?;
    check_eq!(created.name, fetched.name);

    remove_genre(&created).await
}

#[tanu::test(Role::User, 403; "user")]
#[tanu::test(Role::Admin, 403; "admin")]
async fn genre_creation_is_restricted(role: Role, status: u16) -> eyre::Result<()> {
    let mut fixtures = fixtures();
    let root = super_admin().await?;
    let actor = fixtures.actor(role, root).await?;

    let outcome = async {
        actor
            .api
            .genres()
            .create_genre(&fixtures.data().genre())
            .expect_status(status)
            .send()
            .await?;
        eyre::Ok(())
    }
    .await;
    actor.teardown_after(outcome).await
}

#[tanu::test]
async fn anonymous_cannot_create_genre() -> eyre::Result<()> {
    let mut fixtures = fixtures();
    let request = fixtures.data().genre();
    fixtures
        .unauthenticated()
        .genres()
        .create_genre(&request)
        .expect_status(401u16)
        .send()
        .await?;
    Ok(())
}

#[tanu::test]
async fn list_contains_created_genre() -> eyre::Result<()> {
    let mut fixtures = fixtures();
    let genre = create_genre(&mut fixtures).await?;

    let genres: Vec<Genre> = fixtures
        .unauthenticated()
        .genres()
        .get_genres()
        .send()
        .await?
        .validated()?;
    check!(
        genres.iter().any(|g| g.id == genre.id),
        "genre {} missing from listing",
        genre.id
    );

    remove_genre(&genre).await
}

#[tanu::test]
async fn deleting_a_genre_twice_is_tolerated() -> eyre::Result<()> {
    let mut fixtures = fixtures();
    let genre = create_genre(&mut fixtures).await?;
    let genres = super_admin().await?.api.genres();

    check_eq!(Cleanup::Deleted, genres.delete_genre_if_exists(genre.id).await?);
    check_eq!(Cleanup::AlreadyGone, genres.delete_genre_if_exists(genre.id).await?);

    fixtures
        .unauthenticated()
        .genres()
        .get_genre(genre.id)
        .expect_status(404u16)
        .send()
        .await?;
    Ok(())
}
