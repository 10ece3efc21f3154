//! In-memory driven-port adapters.
//!
//! Each repository keeps rows in insertion order behind a `Mutex<Vec<_>>` and
//! mirrors the ordering and uniqueness guarantees of the PostgreSQL adapters,
//! so HTTP and integration tests observe the same behaviour without a
//! database.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use pagination::{Page, PageWindow};

use crate::domain::ports::{
    MessageRepository, MessageRepositoryError, NurseRepository, NurseRepositoryError,
    PatientRepository, PatientRepositoryError, ReviewRepository, ReviewRepositoryError,
    ServiceRequestRepository, ServiceRequestRepositoryError, SupportRepository,
    SupportRepositoryError, TransactionRepository, TransactionRepositoryError, UserRepository,
    UserRepositoryError,
};
use crate::domain::{
    Faq, Message, NurseAccount, NurseId, NurseProfile, NurseSearch, Patient, PatientId, Review,
    ServiceRequest, ServiceRequestId, SupportRequest, Transaction, TransactionId, UserAccount,
    UserId, UserProfile,
};

fn lock<T>(rows: &Mutex<T>) -> MutexGuard<'_, T> {
    rows.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn paged<T: Clone>(window: PageWindow, matches: &[T]) -> Page<T> {
    Page::new(
        window,
        matches.len() as u64,
        window.slice(matches).to_vec(),
    )
}

/// Users keyed by unique user name.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    rows: Mutex<Vec<UserAccount>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, account: &UserAccount) -> Result<(), UserRepositoryError> {
        let mut rows = lock(&self.rows);
        let user_name = account.profile.user_name.as_str();
        if rows.iter().any(|row| row.profile.user_name == user_name) {
            return Err(UserRepositoryError::duplicate_user_name(user_name));
        }
        rows.push(account.clone());
        Ok(())
    }

    async fn find_by_user_name(
        &self,
        user_name: &str,
    ) -> Result<Option<UserAccount>, UserRepositoryError> {
        Ok(lock(&self.rows)
            .iter()
            .find(|row| row.profile.user_name == user_name)
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, UserRepositoryError> {
        Ok(lock(&self.rows)
            .iter()
            .find(|row| row.profile.id == *id)
            .cloned())
    }

    async fn update_profile(&self, profile: &UserProfile) -> Result<bool, UserRepositoryError> {
        let mut rows = lock(&self.rows);
        let Some(row) = rows.iter_mut().find(|row| row.profile.id == profile.id) else {
            return Ok(false);
        };
        row.profile.name = profile.name.clone();
        row.profile.foto = profile.foto.clone();
        Ok(true)
    }

    async fn list(&self, window: PageWindow) -> Result<Page<UserProfile>, UserRepositoryError> {
        let profiles: Vec<UserProfile> = lock(&self.rows)
            .iter()
            .map(|row| row.profile.clone())
            .collect();
        Ok(paged(window, &profiles))
    }
}

/// Nurses keyed by unique user name.
#[derive(Debug, Default)]
pub struct InMemoryNurseRepository {
    rows: Mutex<Vec<NurseAccount>>,
}

#[async_trait]
impl NurseRepository for InMemoryNurseRepository {
    async fn insert(&self, account: &NurseAccount) -> Result<(), NurseRepositoryError> {
        let mut rows = lock(&self.rows);
        if rows.iter().any(|row| row.user_name == account.user_name) {
            return Err(NurseRepositoryError::duplicate_user_name(
                account.user_name.as_str(),
            ));
        }
        rows.push(account.clone());
        Ok(())
    }

    async fn find_by_user_name(
        &self,
        user_name: &str,
    ) -> Result<Option<NurseAccount>, NurseRepositoryError> {
        Ok(lock(&self.rows)
            .iter()
            .find(|row| row.user_name == user_name)
            .cloned())
    }

    async fn find_by_id(&self, id: &NurseId) -> Result<Option<NurseAccount>, NurseRepositoryError> {
        Ok(lock(&self.rows)
            .iter()
            .find(|row| row.profile.id == *id)
            .cloned())
    }

    async fn update_profile(&self, profile: &NurseProfile) -> Result<bool, NurseRepositoryError> {
        let mut rows = lock(&self.rows);
        let Some(row) = rows.iter_mut().find(|row| row.profile.id == profile.id) else {
            return Ok(false);
        };
        row.profile = profile.clone();
        Ok(true)
    }

    async fn search(
        &self,
        search: &NurseSearch,
        window: PageWindow,
    ) -> Result<Page<NurseProfile>, NurseRepositoryError> {
        let matches: Vec<NurseProfile> = lock(&self.rows)
            .iter()
            .map(|row| &row.profile)
            .filter(|profile| search.matches(profile))
            .cloned()
            .collect();
        Ok(paged(window, &matches))
    }
}

/// Patients in creation order.
#[derive(Debug, Default)]
pub struct InMemoryPatientRepository {
    rows: Mutex<Vec<Patient>>,
}

#[async_trait]
impl PatientRepository for InMemoryPatientRepository {
    async fn insert(&self, patient: &Patient) -> Result<(), PatientRepositoryError> {
        lock(&self.rows).push(patient.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &PatientId) -> Result<Option<Patient>, PatientRepositoryError> {
        Ok(lock(&self.rows).iter().find(|row| row.id == *id).cloned())
    }

    async fn update(&self, patient: &Patient) -> Result<bool, PatientRepositoryError> {
        let mut rows = lock(&self.rows);
        let Some(row) = rows.iter_mut().find(|row| row.id == patient.id) else {
            return Ok(false);
        };
        *row = patient.clone();
        Ok(true)
    }

    async fn delete(&self, id: &PatientId) -> Result<bool, PatientRepositoryError> {
        let mut rows = lock(&self.rows);
        let before = rows.len();
        rows.retain(|row| row.id != *id);
        Ok(rows.len() < before)
    }

    async fn list_for_owner(
        &self,
        owner: &UserId,
        window: PageWindow,
    ) -> Result<Page<Patient>, PatientRepositoryError> {
        let matches: Vec<Patient> = lock(&self.rows)
            .iter()
            .filter(|row| row.usuario_id == *owner)
            .cloned()
            .collect();
        Ok(paged(window, &matches))
    }
}

/// Service requests in creation order; updates overwrite in place.
#[derive(Debug, Default)]
pub struct InMemoryServiceRequestRepository {
    rows: Mutex<Vec<ServiceRequest>>,
}

#[async_trait]
impl ServiceRequestRepository for InMemoryServiceRequestRepository {
    async fn insert(&self, request: &ServiceRequest) -> Result<(), ServiceRequestRepositoryError> {
        lock(&self.rows).push(request.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &ServiceRequestId,
    ) -> Result<Option<ServiceRequest>, ServiceRequestRepositoryError> {
        Ok(lock(&self.rows).iter().find(|row| row.id == *id).cloned())
    }

    async fn update(
        &self,
        request: &ServiceRequest,
    ) -> Result<bool, ServiceRequestRepositoryError> {
        let mut rows = lock(&self.rows);
        let Some(row) = rows.iter_mut().find(|row| row.id == request.id) else {
            return Ok(false);
        };
        *row = request.clone();
        Ok(true)
    }

    async fn list_all(&self) -> Result<Vec<ServiceRequest>, ServiceRequestRepositoryError> {
        Ok(lock(&self.rows).clone())
    }

    async fn list_for_nurse(
        &self,
        nurse_id: &NurseId,
    ) -> Result<Vec<ServiceRequest>, ServiceRequestRepositoryError> {
        Ok(lock(&self.rows)
            .iter()
            .filter(|row| row.nurse_id == *nurse_id)
            .cloned()
            .collect())
    }
}

/// Messages, oldest first within a request.
#[derive(Debug, Default)]
pub struct InMemoryMessageRepository {
    rows: Mutex<Vec<Message>>,
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn insert(&self, message: &Message) -> Result<(), MessageRepositoryError> {
        lock(&self.rows).push(message.clone());
        Ok(())
    }

    async fn list_for_request(
        &self,
        service_request_id: &ServiceRequestId,
        window: PageWindow,
    ) -> Result<Page<Message>, MessageRepositoryError> {
        let mut matches: Vec<Message> = lock(&self.rows)
            .iter()
            .filter(|row| row.service_request_id == *service_request_id)
            .cloned()
            .collect();
        matches.sort_by_key(|message| message.timestamp);
        Ok(paged(window, &matches))
    }
}

/// Reviews, newest first, unique per user and request.
#[derive(Debug, Default)]
pub struct InMemoryReviewRepository {
    rows: Mutex<Vec<Review>>,
}

#[async_trait]
impl ReviewRepository for InMemoryReviewRepository {
    async fn insert(&self, review: &Review) -> Result<(), ReviewRepositoryError> {
        let mut rows = lock(&self.rows);
        if rows.iter().any(|row| {
            row.user_id == review.user_id && row.service_request_id == review.service_request_id
        }) {
            return Err(ReviewRepositoryError::duplicate(format!(
                "user {} already reviewed request {}",
                review.user_id, review.service_request_id
            )));
        }
        rows.push(review.clone());
        Ok(())
    }

    async fn list_for_nurse(
        &self,
        nurse_id: &NurseId,
        window: PageWindow,
    ) -> Result<Page<Review>, ReviewRepositoryError> {
        let matches: Vec<Review> = lock(&self.rows)
            .iter()
            .rev()
            .filter(|row| row.nurse_id == *nurse_id)
            .cloned()
            .collect();
        Ok(paged(window, &matches))
    }
}

/// Transactions, newest payment first, one per request.
#[derive(Debug, Default)]
pub struct InMemoryTransactionRepository {
    rows: Mutex<Vec<Transaction>>,
}

#[async_trait]
impl TransactionRepository for InMemoryTransactionRepository {
    async fn insert(&self, transaction: &Transaction) -> Result<(), TransactionRepositoryError> {
        let mut rows = lock(&self.rows);
        if rows
            .iter()
            .any(|row| row.service_request_id == transaction.service_request_id)
        {
            return Err(TransactionRepositoryError::duplicate(format!(
                "request {} already paid",
                transaction.service_request_id
            )));
        }
        rows.push(transaction.clone());
        Ok(())
    }

    async fn find_for_request(
        &self,
        service_request_id: &ServiceRequestId,
    ) -> Result<Option<Transaction>, TransactionRepositoryError> {
        Ok(lock(&self.rows)
            .iter()
            .find(|row| row.service_request_id == *service_request_id)
            .cloned())
    }

    async fn find_for_nurse(
        &self,
        id: &TransactionId,
        nurse_id: &NurseId,
    ) -> Result<Option<Transaction>, TransactionRepositoryError> {
        Ok(lock(&self.rows)
            .iter()
            .find(|row| row.id == *id && row.nurse_id == *nurse_id)
            .cloned())
    }

    async fn list_for_nurse(
        &self,
        nurse_id: &NurseId,
        window: PageWindow,
    ) -> Result<Page<Transaction>, TransactionRepositoryError> {
        let mut matches: Vec<Transaction> = lock(&self.rows)
            .iter()
            .filter(|row| row.nurse_id == *nurse_id)
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.fecha_pago.cmp(&a.fecha_pago));
        Ok(paged(window, &matches))
    }
}

/// Support requests plus a seedable FAQ list.
#[derive(Debug, Default)]
pub struct InMemorySupportRepository {
    requests: Mutex<Vec<SupportRequest>>,
    faqs: Mutex<Vec<Faq>>,
}

impl InMemorySupportRepository {
    /// Repository pre-populated with `faqs` in the given order.
    pub fn with_faqs(faqs: Vec<Faq>) -> Self {
        Self {
            requests: Mutex::default(),
            faqs: Mutex::new(faqs),
        }
    }

    /// Every support request recorded so far.
    pub fn requests(&self) -> Vec<SupportRequest> {
        lock(&self.requests).clone()
    }
}

#[async_trait]
impl SupportRepository for InMemorySupportRepository {
    async fn insert_request(&self, request: &SupportRequest) -> Result<(), SupportRepositoryError> {
        lock(&self.requests).push(request.clone());
        Ok(())
    }

    async fn list_faqs(&self, window: PageWindow) -> Result<Page<Faq>, SupportRepositoryError> {
        Ok(paged(window, &lock(&self.faqs)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PasswordHash, ReviewId, Rating};
    use chrono::{TimeZone, Utc};

    fn account(user_name: &str) -> UserAccount {
        UserAccount {
            profile: UserProfile {
                id: UserId::random(),
                name: "Ana".to_owned(),
                user_name: user_name.to_owned(),
                foto: None,
                verificado: "false".to_owned(),
            },
            password_hash: PasswordHash::new("fixture$pw"),
        }
    }

    #[tokio::test]
    async fn user_names_are_unique() {
        let repo = InMemoryUserRepository::default();
        repo.insert(&account("ana")).await.expect("first insert");
        let err = repo
            .insert(&account("ana"))
            .await
            .expect_err("duplicate rejected");
        assert_eq!(err, UserRepositoryError::duplicate_user_name("ana"));
    }

    #[tokio::test]
    async fn reviews_list_newest_first_and_reject_repeats() {
        let repo = InMemoryReviewRepository::default();
        let nurse_id = NurseId::random();
        let user_id = UserId::random();
        let review = |request: ServiceRequestId, hour: u32| Review {
            id: ReviewId::random(),
            user_id,
            nurse_id,
            service_request_id: request,
            calificacion: Rating::new(5).expect("in range"),
            comentario: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap(),
        };
        let first = review(ServiceRequestId::random(), 8);
        let second = review(ServiceRequestId::random(), 9);
        repo.insert(&first).await.expect("first");
        repo.insert(&second).await.expect("second");
        assert!(repo.insert(&first).await.is_err());

        let page = repo
            .list_for_nurse(&nurse_id, PageWindow::default())
            .await
            .expect("page");
        assert_eq!(page.total(), 2);
        assert_eq!(page.items()[0].id, second.id);
    }
}
