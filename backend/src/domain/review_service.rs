//! Reviews of nurses on completed service requests.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{Page, PageWindow};
use tracing::{debug, info};

use super::ports::{ReviewRepository, ReviewsCommand, ReviewsQuery, ServiceRequestRepository};
use super::repository_errors::{map_review_error, map_service_request_error};
use super::review::cannot_review;
use super::{Caller, Error, Estado, NewReview, NurseId, Review, ReviewId};

/// Review service implementing the review driving ports.
#[derive(Clone)]
pub struct ReviewService<R, S> {
    reviews: Arc<R>,
    requests: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<R, S> ReviewService<R, S> {
    /// Create the service over review and service request repositories.
    pub fn new(reviews: Arc<R>, requests: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            reviews,
            requests,
            clock,
        }
    }
}

#[async_trait]
impl<R, S> ReviewsCommand for ReviewService<R, S>
where
    R: ReviewRepository,
    S: ServiceRequestRepository,
{
    async fn create(&self, caller: Caller, new: NewReview) -> Result<Review, Error> {
        let request = self
            .requests
            .find_by_id(&new.service_request_id)
            .await
            .map_err(map_service_request_error)?;

        let eligible = request.as_ref().is_some_and(|request| {
            request.estado == Estado::Completado
                && caller.user_id() == Some(request.user_id)
                && request.nurse_id == new.nurse_id
        });
        let Some(request) = request.filter(|_| eligible) else {
            debug!(
                service_request_id = %new.service_request_id,
                caller = %caller.id(),
                "review rejected"
            );
            return Err(cannot_review(
                "reviews require a completed service request opened by the caller for this nurse",
            ));
        };

        let review = Review {
            id: ReviewId::random(),
            user_id: request.user_id,
            nurse_id: request.nurse_id,
            service_request_id: request.id,
            calificacion: new.calificacion,
            comentario: new.comentario,
            created_at: self.clock.utc(),
        };
        self.reviews
            .insert(&review)
            .await
            .map_err(map_review_error)?;
        info!(review_id = %review.id, nurse_id = %review.nurse_id, "review recorded");
        Ok(review)
    }
}

#[async_trait]
impl<R, S> ReviewsQuery for ReviewService<R, S>
where
    R: ReviewRepository,
    S: ServiceRequestRepository,
{
    async fn list_for_nurse(
        &self,
        caller: Caller,
        nurse_id: NurseId,
        window: PageWindow,
    ) -> Result<Page<Review>, Error> {
        if caller.nurse_id() != Some(nurse_id) {
            debug!(%nurse_id, caller = %caller.id(), "review listing denied");
            return Err(Error::forbidden("nurses may only read their own reviews"));
        }
        self.reviews
            .list_for_nurse(&nurse_id, window)
            .await
            .map_err(map_review_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        FixtureReviewRepository, FixtureServiceRequestRepository, MockReviewRepository,
        MockServiceRequestRepository, ReviewRepositoryError,
    };
    use crate::domain::review::CANNOT_REVIEW_CODE;
    use crate::domain::{
        ErrorCode, NewServiceRequest, PatientId, Rating, Role, ServiceRequest, ServiceRequestId,
        UserId,
    };
    use crate::test_support::MutableClock;
    use chrono::{DateTime, TimeZone, Utc};
    use rstest::{fixture, rstest};
    use uuid::Uuid;

    fn fixture_timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0)
            .single()
            .expect("valid fixture timestamp")
    }

    #[fixture]
    fn completed() -> ServiceRequest {
        ServiceRequest::create(
            ServiceRequestId::random(),
            NewServiceRequest {
                user_id: UserId::random(),
                nurse_id: NurseId::random(),
                patient_ids: vec![PatientId::random()],
                estado: Estado::Completado,
                detalles: "checkup".to_owned(),
                fecha: fixture_timestamp(),
                tarifa: 50.0,
                pago_realizado: true,
                pago_liberado: false,
            },
            fixture_timestamp(),
        )
    }

    fn review_of(request: &ServiceRequest) -> NewReview {
        NewReview {
            nurse_id: request.nurse_id,
            service_request_id: request.id,
            calificacion: Rating::new(5).expect("valid rating"),
            comentario: Some("excelente".to_owned()),
        }
    }

    fn serving(request: Option<ServiceRequest>) -> MockServiceRequestRepository {
        let mut repo = MockServiceRequestRepository::new();
        repo.expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(request));
        repo
    }

    fn service<R, S>(reviews: R, requests: S) -> ReviewService<R, S> {
        ReviewService::new(
            Arc::new(reviews),
            Arc::new(requests),
            Arc::new(MutableClock::new(fixture_timestamp())),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn requesting_user_reviews_completed_request(completed: ServiceRequest) {
        let caller = Caller::new(*completed.user_id.as_uuid(), Role::User);
        let new = review_of(&completed);
        let mut reviews = MockReviewRepository::new();
        reviews
            .expect_insert()
            .withf(|review| review.calificacion.get() == 5)
            .times(1)
            .return_once(|_| Ok(()));

        let review = service(reviews, serving(Some(completed)))
            .create(caller, new)
            .await
            .expect("eligible review");
        assert_eq!(review.created_at, fixture_timestamp());
    }

    #[rstest]
    #[case::pending(Estado::Pendiente)]
    #[case::in_progress(Estado::EnProgreso)]
    #[tokio::test]
    async fn unfinished_request_cannot_be_reviewed(
        mut completed: ServiceRequest,
        #[case] estado: Estado,
    ) {
        completed.estado = estado;
        let caller = Caller::new(*completed.user_id.as_uuid(), Role::User);
        let new = review_of(&completed);

        let err = service(FixtureReviewRepository, serving(Some(completed)))
            .create(caller, new)
            .await
            .expect_err("not completed");
        assert_eq!(err.code(), ErrorCode::Forbidden);
        assert_eq!(err.detail_code(), Some(CANNOT_REVIEW_CODE));
    }

    #[rstest]
    #[tokio::test]
    async fn other_user_cannot_review(completed: ServiceRequest) {
        let new = review_of(&completed);
        let err = service(FixtureReviewRepository, serving(Some(completed)))
            .create(Caller::new(Uuid::new_v4(), Role::User), new)
            .await
            .expect_err("not the requesting user");
        assert_eq!(err.detail_code(), Some(CANNOT_REVIEW_CODE));
    }

    #[rstest]
    #[tokio::test]
    async fn mismatched_nurse_cannot_be_reviewed(completed: ServiceRequest) {
        let caller = Caller::new(*completed.user_id.as_uuid(), Role::User);
        let mut new = review_of(&completed);
        new.nurse_id = NurseId::random();

        let err = service(FixtureReviewRepository, serving(Some(completed)))
            .create(caller, new)
            .await
            .expect_err("wrong nurse");
        assert_eq!(err.detail_code(), Some(CANNOT_REVIEW_CODE));
    }

    #[rstest]
    #[tokio::test]
    async fn second_review_is_conflict(completed: ServiceRequest) {
        let caller = Caller::new(*completed.user_id.as_uuid(), Role::User);
        let new = review_of(&completed);
        let mut reviews = MockReviewRepository::new();
        reviews
            .expect_insert()
            .times(1)
            .return_once(|_| Err(ReviewRepositoryError::duplicate("user_id, service_request_id")));

        let err = service(reviews, serving(Some(completed)))
            .create(caller, new)
            .await
            .expect_err("duplicate review");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[tokio::test]
    async fn only_reviewed_nurse_reads_reviews() {
        let nurse_id = NurseId::random();
        let err = service(FixtureReviewRepository, FixtureServiceRequestRepository)
            .list_for_nurse(
                Caller::new(Uuid::new_v4(), Role::Nurse),
                nurse_id,
                PageWindow::default(),
            )
            .await
            .expect_err("other nurse");
        assert_eq!(err.code(), ErrorCode::Forbidden);

        let page = service(FixtureReviewRepository, FixtureServiceRequestRepository)
            .list_for_nurse(
                Caller::new(*nurse_id.as_uuid(), Role::Nurse),
                nurse_id,
                PageWindow::default(),
            )
            .await
            .expect("own reviews");
        assert_eq!(page.total(), 0);
    }
}
