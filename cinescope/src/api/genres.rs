use super::{delete_if_exists, Cleanup};
use crate::{
    http::{RequestBuilder, Requester},
    models::GenreRequest,
    Result,
};

/// Reads are public; writes require SUPER_ADMIN.
#[derive(Debug, Clone, Copy)]
pub struct GenresApi<'a> {
    requester: Requester<'a>,
}

impl<'a> GenresApi<'a> {
    pub(crate) fn new(requester: Requester<'a>) -> GenresApi<'a> {
        GenresApi { requester }
    }

    pub fn get_genres(&self) -> RequestBuilder<'a> {
        self.requester.get("/genres")
    }

    pub fn get_genre(&self, id: i64) -> RequestBuilder<'a> {
        self.requester.get(&format!("/genres/{id}"))
    }

    pub fn create_genre(&self, genre: &GenreRequest) -> RequestBuilder<'a> {
        self.requester.post("/genres").json(genre).expect_status(201u16)
    }

    pub fn delete_genre(&self, id: i64) -> RequestBuilder<'a> {
        self.requester.delete(&format!("/genres/{id}"))
    }

    pub async fn delete_genre_if_exists(&self, id: i64) -> Result<Cleanup> {
        delete_if_exists(self.delete_genre(id), format!("genre {id}")).await
    }
}
