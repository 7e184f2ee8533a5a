//! `trailhead-domain` — tour, user, and review records.
//!
//! Records validate the way the original schemas did: presence, bounds, and
//! enum membership, with the same user-facing messages. Serialization is
//! camelCase to match the wire format clients query against.

pub mod review;
pub mod tour;
pub mod user;

pub use review::{NewReview, Review};
pub use tour::{Difficulty, NewTour, Tour, UpdateTour};
pub use user::{NewUser, User};
