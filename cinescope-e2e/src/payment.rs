use cinescope::{
    models::{Card, Payment, PaymentCreated, PaymentStatus, PaymentsPage, PaymentsQuery},
    Role,
};
use tanu::{check, check_eq, eyre};

use crate::{create_movie, fixtures, remove_movie, super_admin};

#[tanu::test]
async fn user_pays_for_a_movie() -> eyre::Result<()> {
    let mut fixtures = fixtures();
    let (genre, movie) = create_movie(&mut fixtures).await?;
    let user = fixtures.common_user(super_admin().await?).await?;

    let outcome = async {
        let payment = user.api.payment();
        let created: PaymentCreated = payment
            .create_payment(&fixtures.data().payment(movie.id))
            .send()
            .await?
            .validated()?;
        check_eq!(PaymentStatus::Success, created.status);

        let own: Vec<Payment> = payment.get_user_payments().send().await?.validated()?;
        check!(
            own.iter().any(|p| p.movie_id == movie.id),
            "payment for movie {} missing",
            movie.id
        );
        eyre::Ok(())
    }
    .await;
    let outcome = user.teardown_after(outcome).await;
    let removed = remove_movie(&genre, &movie).await;
    outcome.and(removed)
}

#[tanu::test]
async fn invalid_card_is_rejected() -> eyre::Result<()> {
    let mut fixtures = fixtures();
    let (genre, movie) = create_movie(&mut fixtures).await?;
    let user = fixtures.common_user(super_admin().await?).await?;

    let mut request = fixtures.data().payment(movie.id);
    request.card = Card {
        card_number: "4242424242424241".into(),
        ..Card::test_card()
    };
    let outcome = async {
        let res = user
            .api
            .payment()
            .create_payment(&request)
            .expect_status([400u16, 201])
            .send()
            .await?;
        if res.status().is_success() {
            let created: PaymentCreated = res.validated()?;
            check_eq!(PaymentStatus::InvalidCard, created.status);
        }
        eyre::Ok(())
    }
    .await;
    let outcome = user.teardown_after(outcome).await;
    let removed = remove_movie(&genre, &movie).await;
    outcome.and(removed)
}

#[tanu::test(Role::SuperAdmin; "super_admin")]
#[tanu::test(Role::Admin; "admin")]
async fn payments_of_a_user_by_id(role: Role) -> eyre::Result<()> {
    let mut fixtures = fixtures();
    let root = super_admin().await?;
    let actor = fixtures.actor(role, root).await?;

    let outcome = async {
        let own = actor.api.user().get_user(&actor.email).send().await?;
        let own: cinescope::models::User = own.validated()?;
        let _: Vec<Payment> = actor
            .api
            .payment()
            .get_user_payments_by_id(&own.id)
            .send()
            .await?
            .validated()?;
        eyre::Ok(())
    }
    .await;
    actor.teardown_after(outcome).await
}

#[tanu::test(Role::SuperAdmin, "desc"; "super_admin")]
#[tanu::test(Role::Admin, "asc"; "admin")]
async fn find_all_payments(role: Role, created_at: &str) -> eyre::Result<()> {
    let mut fixtures = fixtures();
    let actor = fixtures.actor(role, super_admin().await?).await?;
    let query = PaymentsQuery {
        page: Some(1),
        page_size: Some(10),
        status: Some(PaymentStatus::Success),
        created_at: Some(created_at.to_string()),
    };

    let outcome = async {
        let page: PaymentsPage = actor
            .api
            .payment()
            .find_all_payments(&query)
            .send()
            .await?
            .validated()?;
        check!(page.payments.len() <= 10);
        check!(page
            .payments
            .iter()
            .all(|p| p.status == PaymentStatus::Success));
        eyre::Ok(())
    }
    .await;
    actor.teardown_after(outcome).await
}

#[tanu::test]
async fn common_user_cannot_find_all_payments() -> eyre::Result<()> {
    let mut fixtures = fixtures();
    let user = fixtures.common_user(super_admin().await?).await?;

    let outcome = async {
        user.api
            .payment()
            .find_all_payments(&PaymentsQuery::default())
            .expect_status(403u16)
            .send()
            .await?;
        eyre::Ok(())
    }
    .await;
    user.teardown_after(outcome).await
}

#[tanu::test]
async fn anonymous_has_no_payments() -> eyre::Result<()> {
    fixtures()
        .unauthenticated()
        .payment()
        .get_user_payments()
        .expect_status(401u16)
        .send()
        .await?;
    Ok(())
}
