use crate::{
    http::{RequestBuilder, Requester},
    models::ReviewRequest,
};

/// Reviews of one movie. Listing is public; the rest needs a session.
#[derive(Debug, Clone, Copy)]
pub struct ReviewsApi<'a> {
    requester: Requester<'a>,
}

impl<'a> ReviewsApi<'a> {
    pub(crate) fn new(requester: Requester<'a>) -> ReviewsApi<'a> {
        ReviewsApi { requester }
    }

    pub fn get_reviews(&self, movie_id: i64) -> RequestBuilder<'a> {
        self.requester.get(&format!("/movies/{movie_id}/reviews"))
    }

    pub fn create_review(&self, movie_id: i64, review: &ReviewRequest) -> RequestBuilder<'a> {
        self.requester
            .post(&format!("/movies/{movie_id}/reviews"))
            .json(review)
            .expect_status(201u16)
    }

    pub fn update_review(&self, movie_id: i64, review: &ReviewRequest) -> RequestBuilder<'a> {
        self.requester
            .put(&format!("/movies/{movie_id}/reviews"))
            .json(review)
    }

    pub fn hide_review(&self, movie_id: i64, user_id: &str) -> RequestBuilder<'a> {
        self.requester
            .patch(&format!("/movies/{movie_id}/reviews/hide/{user_id}"))
    }

    pub fn show_review(&self, movie_id: i64, user_id: &str) -> RequestBuilder<'a> {
        self.requester
            .patch(&format!("/movies/{movie_id}/reviews/show/{user_id}"))
    }
}
