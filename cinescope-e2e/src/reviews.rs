use cinescope::models::Review;
use tanu::{check, check_eq, eyre};

use crate::{create_movie, fixtures, remove_movie, super_admin};

#[tanu::test]
async fn user_reviews_and_updates_a_movie() -> eyre::Result<()> {
    let mut fixtures = fixtures();
    let (genre, movie) = create_movie(&mut fixtures).await?;
    let user = fixtures.common_user(super_admin().await?).await?;

    let outcome = async {
        let reviews = user.api.reviews();
        let request = fixtures.data().review();
        let created: Review = reviews
            .create_review(movie.id, &request)
            .send()
            .await?
            .validated()?;
        check_eq!(request.text, created.text);
        check_eq!(request.rating, created.rating);
        check_eq!(user.id.as_deref(), Some(created.user_id.as_str()));

        let update = fixtures.data().review();
        let updated: Review = reviews
            .update_review(movie.id, &update)
            .send()
            .await?
            .validated()?;
        check_eq!(update.text, updated.text);

        let listed: Vec<Review> = fixtures
            .unauthenticated()
            .reviews()
            .get_reviews(movie.id)
            .send()
            .await?
            .validated()?;
        check!(
            listed.iter().any(|review| review.text == update.text),
            "updated review missing from listing"
        );
        eyre::Ok(())
    }
    .await;
    let outcome = user.teardown_after(outcome).await;
    let removed = remove_movie(&genre, &movie).await;
    outcome.and(removed)
}

#[tanu::test]
async fn super_admin_hides_and_shows_review() -> eyre::Result<()> {
    let mut fixtures = fixtures();
    let (genre, movie) = create_movie(&mut fixtures).await?;
    let reviews = super_admin().await?.api.reviews();

    let created: Review = reviews
        .create_review(movie.id, &fixtures.data().review())
        .send()
        .await?
        .validated()?;

    reviews.hide_review(movie.id, &created.user_id).send().await?;
    reviews.show_review(movie.id, &created.user_id).send().await?;

    remove_movie(&genre, &movie).await
}

#[tanu::test]
async fn second_review_by_same_user_conflicts() -> eyre::Result<()> {
    let mut fixtures = fixtures();
    let (genre, movie) = create_movie(&mut fixtures).await?;
    let user = fixtures.common_user(super_admin().await?).await?;

    let outcome = async {
        let reviews = user.api.reviews();
        reviews
            .create_review(movie.id, &fixtures.data().review())
            .send()
            .await?;
        reviews
            .create_review(movie.id, &fixtures.data().review())
            .expect_status(409u16)
            .send()
            .await?;
        eyre::Ok(())
    }
    .await;
    let outcome = user.teardown_after(outcome).await;
    let removed = remove_movie(&genre, &movie).await;
    outcome.and(removed)
}

#[tanu::test]
async fn anonymous_cannot_review() -> eyre::Result<()> {
    let mut fixtures = fixtures();
    let (genre, movie) = create_movie(&mut fixtures).await?;

    fixtures
        .unauthenticated()
        .reviews()
        .create_review(movie.id, &fixtures.data().review())
        .expect_status(401u16)
        .send()
        .await?;

    remove_movie(&genre, &movie).await
}

#[tanu::test]
async fn reviews_of_missing_movie() -> eyre::Result<()> {
    fixtures()
        .unauthenticated()
        .reviews()
        .get_reviews(i64::from(i32::MAX))
        .expect_status(404u16)
        .send()
        .await?;
    Ok(())
}
