use super::{delete_if_exists, Cleanup};
use crate::{
    http::{RequestBuilder, Requester},
    models::{MovieData, MovieFilter},
    Result,
};

#[derive(Debug, Clone, Copy)]
pub struct MoviesApi<'a> {
    requester: Requester<'a>,
}

impl<'a> MoviesApi<'a> {
    pub(crate) fn new(requester: Requester<'a>) -> MoviesApi<'a> {
        MoviesApi { requester }
    }

    pub fn get_movies(&self, filter: &MovieFilter) -> RequestBuilder<'a> {
        self.requester.get("/movies").query(&filter.pairs())
    }

    pub fn get_movie(&self, id: i64) -> RequestBuilder<'a> {
        self.requester.get(&format!("/movies/{id}"))
    }

    pub fn create_movie(&self, movie: &MovieData) -> RequestBuilder<'a> {
        self.requester.post("/movies").json(movie).expect_status(201u16)
    }

    pub fn delete_movie(&self, id: i64) -> RequestBuilder<'a> {
        self.requester.delete(&format!("/movies/{id}"))
    }

    pub async fn delete_movie_if_exists(&self, id: i64) -> Result<Cleanup> {
        delete_if_exists(self.delete_movie(id), format!("movie {id}")).await
    }
}
