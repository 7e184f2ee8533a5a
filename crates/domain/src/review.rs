//! Review record: rating plus text, parent-referencing a tour and a user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use trailhead_core::{DomainError, DomainResult, ReviewId, TourId, UserId};

/// A persisted review.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub review: String,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
    /// Parent reference; a tour can carry thousands of reviews, so the
    /// reference lives on the review side.
    pub tour: TourId,
    pub user: UserId,
}

/// Creation input. The authoring user comes from the authenticated request
/// context, not the body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub review: Option<String>,
    pub rating: Option<f64>,
    pub tour: Option<TourId>,
}

impl Review {
    pub fn create(
        id: ReviewId,
        input: NewReview,
        user: UserId,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let review = input
            .review
            .filter(|r| !r.trim().is_empty())
            .ok_or_else(|| DomainError::validation("Review can not be empty"))?
            .trim()
            .to_string();

        let rating = input.rating.unwrap_or(5.0);
        if !(1.0..=5.0).contains(&rating) {
            return Err(DomainError::validation("Rating must be between 1 and 5"));
        }

        let tour = input
            .tour
            .ok_or_else(|| DomainError::validation("Review must belong to a tour"))?;

        Ok(Self {
            id,
            review,
            rating,
            created_at: now,
            tour,
            user,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_review_text_is_rejected() {
        let input = NewReview {
            review: Some("   ".into()),
            rating: Some(4.0),
            tour: Some(TourId::new()),
        };
        let err = Review::create(ReviewId::new(), input, UserId::new(), Utc::now()).unwrap_err();
        assert_eq!(err, DomainError::validation("Review can not be empty"));
    }

    #[test]
    fn rating_is_bounded() {
        let input = NewReview {
            review: Some("Lovely trail".into()),
            rating: Some(5.5),
            tour: Some(TourId::new()),
        };
        let err = Review::create(ReviewId::new(), input, UserId::new(), Utc::now()).unwrap_err();
        assert_eq!(err, DomainError::validation("Rating must be between 1 and 5"));
    }

    #[test]
    fn missing_tour_reference_is_rejected() {
        let input = NewReview {
            review: Some("Lovely trail".into()),
            rating: Some(4.0),
            tour: None,
        };
        let err = Review::create(ReviewId::new(), input, UserId::new(), Utc::now()).unwrap_err();
        assert_eq!(err, DomainError::validation("Review must belong to a tour"));
    }
}
