//! Reviews left by users on completed service requests.

use std::fmt;

use chrono::{DateTime, Utc};
use pagination::ItemsKey;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use super::{Error, NurseId, ReviewId, ServiceRequestId, UserId};

/// `details.code` attached when a review is not allowed.
pub const CANNOT_REVIEW_CODE: &str = "cannot_review";

/// Build the `forbidden` error returned when a review is not allowed.
pub fn cannot_review(message: impl Into<String>) -> Error {
    Error::forbidden(message).with_details(json!({ "code": CANNOT_REVIEW_CODE }))
}

/// Star rating between [`Rating::MIN`] and [`Rating::MAX`] inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Rating(u8);

impl utoipa::PartialSchema for Rating {
    fn schema() -> utoipa::openapi::RefOr<utoipa::openapi::schema::Schema> {
        utoipa::openapi::ObjectBuilder::new()
            .schema_type(utoipa::openapi::schema::Type::Integer)
            .format(Some(utoipa::openapi::SchemaFormat::KnownFormat(
                utoipa::openapi::KnownFormat::Int64,
            )))
            .minimum(Some(Self::MIN))
            .maximum(Some(Self::MAX))
            .into()
    }
}

impl ToSchema for Rating {}

/// A rating outside the accepted range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingOutOfRange(pub i64);

impl fmt::Display for RatingOutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "calificacion must be between {} and {}, got {}",
            Rating::MIN,
            Rating::MAX,
            self.0
        )
    }
}

impl std::error::Error for RatingOutOfRange {}

impl Rating {
    /// Lowest accepted rating.
    pub const MIN: u8 = 1;
    /// Highest accepted rating.
    pub const MAX: u8 = 5;

    /// Validate a raw rating.
    pub fn new(raw: i64) -> Result<Self, RatingOutOfRange> {
        u8::try_from(raw)
            .ok()
            .filter(|value| (Self::MIN..=Self::MAX).contains(value))
            .map(Self)
            .ok_or(RatingOutOfRange(raw))
    }

    /// The rating value.
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = RatingOutOfRange;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for i64 {
    fn from(value: Rating) -> Self {
        i64::from(value.0)
    }
}

/// A stored review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Review {
    pub id: ReviewId,
    pub user_id: UserId,
    pub nurse_id: NurseId,
    pub service_request_id: ServiceRequestId,
    pub calificacion: Rating,
    pub comentario: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ItemsKey for Review {
    const ITEMS_KEY: &'static str = "reviews";
}

/// Validated review payload; the reviewing user is always the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub nurse_id: NurseId,
    pub service_request_id: ServiceRequestId,
    pub calificacion: Rating,
    pub comentario: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, true)]
    #[case(5, true)]
    #[case(0, false)]
    #[case(6, false)]
    #[case(-3, false)]
    #[case(300, false)]
    fn rating_bounds(#[case] raw: i64, #[case] ok: bool) {
        assert_eq!(Rating::new(raw).is_ok(), ok);
    }

    #[rstest]
    fn rating_deserialises_with_validation() {
        let parsed: Result<Rating, _> = serde_json::from_str("7");
        assert!(parsed.is_err());
        let parsed: Rating = serde_json::from_str("4").expect("valid rating");
        assert_eq!(parsed.get(), 4);
    }

    #[rstest]
    fn cannot_review_is_forbidden_with_code() {
        let err = cannot_review("not completed");
        assert_eq!(err.code(), crate::domain::ErrorCode::Forbidden);
        assert_eq!(err.detail_code(), Some(CANNOT_REVIEW_CODE));
    }
}
