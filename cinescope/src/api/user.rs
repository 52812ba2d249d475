use super::{delete_if_exists, Cleanup};
use crate::{
    http::{RequestBuilder, Requester},
    models::{UpdateUser, UserData, UsersQuery},
    Result,
};

/// Account management on the auth service. Requires an admin session
/// except where noted.
#[derive(Debug, Clone, Copy)]
pub struct UserApi<'a> {
    requester: Requester<'a>,
}

impl<'a> UserApi<'a> {
    pub(crate) fn new(requester: Requester<'a>) -> UserApi<'a> {
        UserApi { requester }
    }

    /// `locator` is the user id or the email.
    pub fn get_user(&self, locator: &str) -> RequestBuilder<'a> {
        self.requester.get(&format!("/user/{locator}"))
    }

    pub fn get_users(&self, query: &UsersQuery) -> RequestBuilder<'a> {
        self.requester.get("/user").query(&query.pairs())
    }

    pub fn create_user(&self, user: &UserData) -> RequestBuilder<'a> {
        self.requester.post("/user").json(user).expect_status(201u16)
    }

    pub fn patch_user(&self, id: &str, update: &UpdateUser) -> RequestBuilder<'a> {
        self.requester.patch(&format!("/user/{id}")).json(update)
    }

    pub fn delete_user(&self, id: &str) -> RequestBuilder<'a> {
        self.requester.delete(&format!("/user/{id}"))
    }

    pub async fn clean_up_user(&self, id: &str) -> Result<Cleanup> {
        delete_if_exists(self.delete_user(id), format!("user {id}")).await
    }
}
