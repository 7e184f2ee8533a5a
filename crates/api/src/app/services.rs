//! Collection wiring and cross-record operations.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;

use trailhead_auth::{sign_token, AuthError, Claims, PasswordHasher};
use trailhead_core::TourId;
use trailhead_domain::{Review, Tour, User};
use trailhead_store::{Collection, MemoryCollection, StoreError};

use crate::app::AppConfig;

/// Everything a handler needs, shared via `Extension<Arc<AppServices>>`.
pub struct AppServices {
    pub tours: Arc<MemoryCollection<Tour>>,
    pub users: Arc<MemoryCollection<User>>,
    pub reviews: Arc<MemoryCollection<Review>>,
    hasher: PasswordHasher,
    jwt_secret: Vec<u8>,
    token_ttl: Duration,
}

impl AppServices {
    pub fn new(config: AppConfig) -> Self {
        Self {
            tours: Arc::new(MemoryCollection::new()),
            users: Arc::new(MemoryCollection::new()),
            reviews: Arc::new(MemoryCollection::new()),
            hasher: PasswordHasher::new(),
            jwt_secret: config.jwt_secret.into_bytes(),
            token_ttl: Duration::minutes(config.token_ttl_minutes),
        }
    }

    pub fn jwt_secret(&self) -> &[u8] {
        &self.jwt_secret
    }

    pub fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    /// Issue a token for a freshly signed-up or logged-in user.
    pub fn sign_token_for(&self, user: &User) -> Result<String, AuthError> {
        let claims = Claims::new(user.id, user.role, Utc::now(), self.token_ttl);
        sign_token(&claims, &self.jwt_secret)
    }

    /// Email lookup needs the hidden password hash, so it goes through the
    /// typed scan rather than a projected query.
    pub fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.list()?.into_iter().find(|u| u.email == email))
    }

    pub fn tour_name_taken(&self, name: &str, exclude: Option<TourId>) -> Result<bool, StoreError> {
        Ok(self
            .tours
            .list()?
            .iter()
            .any(|t| t.name == name && exclude != Some(t.id)))
    }

    /// Aggregate highly rated tours (ratingsAverage >= 4.5) per difficulty,
    /// ordered by average price ascending.
    pub fn tour_stats(&self) -> Result<Vec<DifficultyStats>, StoreError> {
        #[derive(Default)]
        struct Acc {
            num_tours: u64,
            num_ratings: u64,
            rating_sum: f64,
            price_sum: f64,
            min_price: f64,
            max_price: f64,
        }

        let mut groups: BTreeMap<String, Acc> = BTreeMap::new();
        for tour in self.tours.list()? {
            if tour.ratings_average < 4.5 {
                continue;
            }
            let acc = groups
                .entry(tour.difficulty.to_string().to_uppercase())
                .or_default();
            if acc.num_tours == 0 {
                acc.min_price = tour.price;
                acc.max_price = tour.price;
            } else {
                acc.min_price = acc.min_price.min(tour.price);
                acc.max_price = acc.max_price.max(tour.price);
            }
            acc.num_tours += 1;
            acc.num_ratings += tour.ratings_quantity;
            acc.rating_sum += tour.ratings_average;
            acc.price_sum += tour.price;
        }

        let mut stats: Vec<DifficultyStats> = groups
            .into_iter()
            .map(|(difficulty, acc)| DifficultyStats {
                difficulty,
                num_tours: acc.num_tours,
                num_ratings: acc.num_ratings,
                avg_rating: acc.rating_sum / acc.num_tours as f64,
                avg_price: acc.price_sum / acc.num_tours as f64,
                min_price: acc.min_price,
                max_price: acc.max_price,
            })
            .collect();
        stats.sort_by(|a, b| a.avg_price.total_cmp(&b.avg_price));
        Ok(stats)
    }
}

/// Per-difficulty aggregation row for the stats endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyStats {
    pub difficulty: String,
    pub num_tours: u64,
    pub num_ratings: u64,
    pub avg_rating: f64,
    pub avg_price: f64,
    pub min_price: f64,
    pub max_price: f64,
}
