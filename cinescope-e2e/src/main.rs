mod auth;
mod db;
mod genres;
mod movies;
mod payment;
mod reviews;
mod user;

use cinescope::{
    get_config,
    models::{Genre, Movie},
    Actor, Database, Fixtures,
};
use tanu::eyre;
use tokio::sync::OnceCell;

/// Super admin shared by every test; logging in once is enough.
static SUPER_ADMIN: OnceCell<Actor> = OnceCell::const_new();

pub fn fixtures() -> Fixtures {
    Fixtures::new(get_config())
}

pub async fn super_admin() -> eyre::Result<&'static Actor> {
    let actor = SUPER_ADMIN
        .get_or_try_init(|| async { fixtures().super_admin().await })
        .await?;
    Ok(actor)
}

/// Service database, connected on first use.
static DATABASE: OnceCell<Database> = OnceCell::const_new();

pub async fn database() -> eyre::Result<&'static Database> {
    let db = DATABASE
        .get_or_try_init(|| Database::connect(&get_config().database))
        .await?;
    Ok(db)
}

/// Genre created by the super admin, deleted again by [`remove_genre`].
pub async fn create_genre(fixtures: &mut Fixtures) -> eyre::Result<Genre> {
    let root = super_admin().await?;
    let genre = root
        .api
        .genres()
        .create_genre(&fixtures.data().genre())
        .send()
        .await?
        .validated()?;
    Ok(genre)
}

pub async fn remove_genre(genre: &Genre) -> eyre::Result<()> {
    super_admin()
        .await?
        .api
        .genres()
        .delete_genre_if_exists(genre.id)
        .await?;
    Ok(())
}

/// Movie in a fresh genre; both are removed by [`remove_movie`].
pub async fn create_movie(fixtures: &mut Fixtures) -> eyre::Result<(Genre, Movie)> {
    let genre = create_genre(fixtures).await?;
    let root = super_admin().await?;
    let movie = root
        .api
        .movies()
        .create_movie(&fixtures.data().movie(genre.id))
        .send()
        .await?
        .validated()?;
    Ok((genre, movie))
}

pub async fn remove_movie(genre: &Genre, movie: &Movie) -> eyre::Result<()> {
    super_admin()
        .await?
        .api
        .movies()
        .delete_movie_if_exists(movie.id)
        .await?;
    remove_genre(genre).await
}

#[tanu::main]
#[tokio::main]
async fn main() -> eyre::Result<()> {
    let runner = run();
    let app = tanu::App::new();
    app.run(runner).await?;
    Ok(())
}
