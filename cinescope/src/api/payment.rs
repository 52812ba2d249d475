use crate::{
    http::{RequestBuilder, Requester},
    models::{PaymentRequest, PaymentsQuery},
};

/// Payment service. `find-all` requires an admin session.
#[derive(Debug, Clone, Copy)]
pub struct PaymentApi<'a> {
    requester: Requester<'a>,
}

impl<'a> PaymentApi<'a> {
    pub(crate) fn new(requester: Requester<'a>) -> PaymentApi<'a> {
        PaymentApi { requester }
    }

    pub fn create_payment(&self, payment: &PaymentRequest) -> RequestBuilder<'a> {
        self.requester.post("/create").json(payment).expect_status(201u16)
    }

    /// Payments of the session's own user.
    pub fn get_user_payments(&self) -> RequestBuilder<'a> {
        self.requester.get("/user")
    }

    pub fn get_user_payments_by_id(&self, user_id: &str) -> RequestBuilder<'a> {
        self.requester.get(&format!("/user/{user_id}"))
    }

    pub fn find_all_payments(&self, query: &PaymentsQuery) -> RequestBuilder<'a> {
        self.requester.get("/find-all").query(query)
    }
}
