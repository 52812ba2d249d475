use cinescope::{models::Review, Cleanup};
use tanu::{check, check_eq, eyre};

use crate::{create_movie, database, fixtures, remove_movie, super_admin};

#[tanu::test]
async fn registered_user_is_stored() -> eyre::Result<()> {
    let mut fixtures = fixtures();
    let db = database().await?;
    let user = fixtures.registered_user().await?;

    let row = db.users().by_email(&user.data.email).await?;
    let cleanup = fixtures.clean_up_registered(&user).await?;
    check_eq!(Some(user.id.as_str()), row.as_ref().map(|r| r.id.as_str()));
    check_eq!(Some(user.data.full_name.as_str()), row.as_ref().map(|r| r.full_name.as_str()));
    check_eq!(Cleanup::Deleted, cleanup);

    check!(db.users().by_id(&user.id).await?.is_none(), "user {} still stored", user.id);
    check!(db.total_users().await? > 0);
    Ok(())
}

#[tanu::test]
async fn created_movie_is_stored() -> eyre::Result<()> {
    let mut fixtures = fixtures();
    let db = database().await?;
    let (genre, movie) = create_movie(&mut fixtures).await?;

    let stored = db.movies().by_id(movie.id).await?;
    let counted = db.total_movies().await?;
    remove_movie(&genre, &movie).await?;

    check_eq!(Some(movie.name.as_str()), stored.as_ref().map(|m| m.name.as_str()));
    check_eq!(Some(movie.price), stored.as_ref().map(|m| i64::from(m.price)));
    check!(counted > 0);
    check!(db.movies().by_id(movie.id).await?.is_none(), "movie {} still stored", movie.id);
    Ok(())
}

#[tanu::test]
async fn hidden_review_is_flagged_in_database() -> eyre::Result<()> {
    let mut fixtures = fixtures();
    let db = database().await?;
    let (genre, movie) = create_movie(&mut fixtures).await?;
    let reviews = super_admin().await?.api.reviews();

    let outcome = async {
        let created: Review = reviews
            .create_review(movie.id, &fixtures.data().review())
            .send()
            .await?
            .validated()?;
        reviews.hide_review(movie.id, &created.user_id).send().await?;

        let stored = db.reviews().by_ids(movie.id, &created.user_id).await?;
        check_eq!(Some(true), stored.map(|r| r.hidden));
        eyre::Ok(())
    }
    .await;
    let removed = remove_movie(&genre, &movie).await;
    outcome.and(removed)
}
