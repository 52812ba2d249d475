use cinescope::{
    models::{Location, Movie, MovieFilter, MoviesPage},
    Role,
};
use tanu::{check, check_eq, eyre};

use crate::{create_genre, create_movie, fixtures, remove_genre, remove_movie, super_admin};

#[tanu::test]
async fn list_movies_first_page() -> eyre::Result<()> {
    let fixtures = fixtures();
    let page: MoviesPage = fixtures
        .unauthenticated()
        .movies()
        .get_movies(&MovieFilter::page(1, 10))
        .send()
        .await?
        .validated()?;

    check!(page.movies.len() <= 10, "page holds {} movies", page.movies.len());
    Ok(())
}

#[tanu::test(1, 10, Location::Msk; "cheap")]
#[tanu::test(11, 99, Location::Spb; "middle")]
#[tanu::test(100, 1000, Location::Msk; "expensive")]
async fn filter_by_price(min: i64, max: i64, location: Location) -> eyre::Result<()> {
    let fixtures = fixtures();
    let filter = MovieFilter {
        min_price: Some(min),
        max_price: Some(max),
        locations: vec![location],
        ..MovieFilter::default()
    };

    let page: MoviesPage = fixtures
        .unauthenticated()
        .movies()
        .get_movies(&filter)
        .send()
        .await?
        .validated()?;

    for movie in &page.movies {
        check!(
            (min..=max).contains(&movie.price),
            "movie {} costs {}",
            movie.id,
            movie.price
        );
    }
    Ok(())
}

#[tanu::test]
async fn created_movie_matches_request() -> eyre::Result<()> {
    let mut fixtures = fixtures();
    let genre = create_genre(&mut fixtures).await?;
    let root = super_admin().await?;
    let request = fixtures.data().movie(genre.id);

    let movie: Movie = root
        .api
        .movies()
        .create_movie(&request)
        .send()
        .await?
        .validated()?;
    check!(movie.matches(&request), "{movie:?} does not match {request:?}");

    let fetched: Movie = fixtures
        .unauthenticated()
        .movies()
        .get_movie(movie.id)
        .send()
        .await?
        .validated()?;
    check_eq!(movie.id, fetched.id);
    check_eq!(movie.name, fetched.name);

    remove_movie(&genre, &movie).await
}

#[tanu::test]
async fn deleted_movie_is_gone() -> eyre::Result<()> {
    let mut fixtures = fixtures();
    let (genre, movie) = create_movie(&mut fixtures).await?;
    let root = super_admin().await?;

    root.api.movies().delete_movie(movie.id).send().await?;
    root.api
        .movies()
        .get_movie(movie.id)
        .expect_status(404u16)
        .send()
        .await?;

    remove_genre(&genre).await
}

#[tanu::test(Role::User, 403; "user")]
#[tanu::test(Role::Admin, 403; "admin")]
async fn movie_deletion_is_restricted(role: Role, status: u16) -> eyre::Result<()> {
    let mut fixtures = fixtures();
    let (genre, movie) = create_movie(&mut fixtures).await?;
    let actor = fixtures.actor(role, super_admin().await?).await?;

    let outcome = async {
        actor
            .api
            .movies()
            .delete_movie(movie.id)
            .expect_status(status)
            .send()
            .await?;
        eyre::Ok(())
    }
    .await;
    let outcome = actor.teardown_after(outcome).await;
    let removed = remove_movie(&genre, &movie).await;
    outcome.and(removed)
}

#[tanu::test]
async fn user_cannot_create_movie() -> eyre::Result<()> {
    let mut fixtures = fixtures();
    let genre = create_genre(&mut fixtures).await?;
    let user = fixtures.common_user(super_admin().await?).await?;

    let outcome = async {
        user.api
            .movies()
            .create_movie(&fixtures.data().movie(genre.id))
            .expect_status(403u16)
            .send()
            .await?;
        eyre::Ok(())
    }
    .await;
    let outcome = user.teardown_after(outcome).await;
    let removed = remove_genre(&genre).await;
    outcome.and(removed)
}

#[tanu::test]
async fn missing_movie_is_not_found() -> eyre::Result<()> {
    fixtures()
        .unauthenticated()
        .movies()
        .get_movie(i64::from(i32::MAX))
        .expect_status(404u16)
        .send()
        .await?;
    Ok(())
}
