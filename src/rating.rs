//! Rating aggregation
//!
//! A firm's `avgRating`/`ratingCount` are always a function of its reviews.
//! The average is kept at full precision; `display` is for presentation only.

use crate::types::Review;

/// Aggregate of a firm's review ratings
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RatingSummary {
    pub avg_rating: f64,
    pub rating_count: u32,
}

impl RatingSummary {
    /// Summarize the given ratings. No ratings gives 0/0.
    pub fn from_ratings<I>(ratings: I) -> Self
    where
        I: IntoIterator<Item = u8>,
    {
        let (sum, count) = ratings
            .into_iter()
            .fold((0u64, 0u32), |(sum, count), r| (sum + u64::from(r), count + 1));

        if count == 0 {
            return Self::default();
        }

        Self {
            avg_rating: sum as f64 / f64::from(count),
            rating_count: count,
        }
    }

    /// Summarize the reviews that belong to `firm_id`
    pub fn for_firm<'a, I>(firm_id: i64, reviews: I) -> Self
    where
        I: IntoIterator<Item = &'a Review>,
    {
        Self::from_ratings(
            reviews
                .into_iter()
                .filter(|r| r.firm_id == firm_id)
                .map(|r| r.rating),
        )
    }
}

/// One decimal place, the way ratings are shown next to star icons
pub fn display(avg_rating: f64) -> String {
    format!("{:.1}", avg_rating)
}
