//! Tour record and its schema-style validation.

use chrono::{DateTime, Utc};
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use trailhead_core::{DomainError, DomainResult, TourId};

pub const NAME_MIN_LEN: usize = 5;
pub const NAME_MAX_LEN: usize = 40;

/// Tour difficulty grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Difficult,
}

impl FromStr for Difficulty {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "difficult" => Ok(Self::Difficult),
            _ => Err(DomainError::validation(
                "Difficulty is either easy, medium or difficult",
            )),
        }
    }
}

impl core::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Easy => write!(f, "easy"),
            Self::Medium => write!(f, "medium"),
            Self::Difficult => write!(f, "difficult"),
        }
    }
}

/// A persisted tour.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tour {
    pub id: TourId,
    pub name: String,
    pub slug: String,
    pub duration: u32,
    pub max_group_size: u32,
    pub difficulty: Difficulty,
    pub ratings_average: f64,
    pub ratings_quantity: u64,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_discount: Option<f64>,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub image_cover: String,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub start_dates: Vec<DateTime<Utc>>,
    pub secret_tour: bool,
}

/// Creation input. Every field is optional so that presence failures surface
/// as domain validation messages rather than deserialization errors.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTour {
    pub name: Option<String>,
    pub duration: Option<u32>,
    pub max_group_size: Option<u32>,
    pub difficulty: Option<String>,
    pub ratings_average: Option<f64>,
    pub price: Option<f64>,
    pub price_discount: Option<f64>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub image_cover: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub start_dates: Vec<DateTime<Utc>>,
    pub secret_tour: Option<bool>,
}

/// Partial update; only present fields are changed, then the record is
/// re-validated as a whole.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTour {
    pub name: Option<String>,
    pub duration: Option<u32>,
    pub max_group_size: Option<u32>,
    pub difficulty: Option<String>,
    pub ratings_average: Option<f64>,
    pub price: Option<f64>,
    pub price_discount: Option<f64>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub image_cover: Option<String>,
    pub images: Option<Vec<String>>,
    pub start_dates: Option<Vec<DateTime<Utc>>>,
    pub secret_tour: Option<bool>,
}

impl Tour {
    /// Validate creation input and build the record, deriving the slug.
    pub fn create(id: TourId, input: NewTour, now: DateTime<Utc>) -> DomainResult<Self> {
        let name = required_trimmed(input.name, "A tour must have a name")?;
        let duration = input
            .duration
            .ok_or_else(|| DomainError::validation("A tour must have a duration"))?;
        let max_group_size = input
            .max_group_size
            .ok_or_else(|| DomainError::validation("A tour must have a group size"))?;
        let difficulty = input
            .difficulty
            .ok_or_else(|| DomainError::validation("A tour must have a difficulty"))?
            .parse::<Difficulty>()?;
        let price = input
            .price
            .ok_or_else(|| DomainError::validation("A tour must have a price"))?;
        let summary = required_trimmed(input.summary, "A tour must have a description")?;
        let image_cover = required_trimmed(input.image_cover, "A tour must have a cover image")?;

        let tour = Self {
            id,
            slug: slugify(&name),
            name,
            duration,
            max_group_size,
            difficulty,
            ratings_average: input.ratings_average.unwrap_or(4.5),
            ratings_quantity: 0,
            price,
            price_discount: input.price_discount,
            summary,
            description: input.description.map(|d| d.trim().to_string()),
            image_cover,
            images: input.images,
            created_at: now,
            start_dates: input.start_dates,
            secret_tour: input.secret_tour.unwrap_or(false),
        };
        tour.validate()?;
        Ok(tour)
    }

    /// Merge a partial update, then re-validate the whole record.
    pub fn apply_update(&mut self, update: UpdateTour) -> DomainResult<()> {
        if let Some(name) = update.name {
            let name = name.trim().to_string();
            self.slug = slugify(&name);
            self.name = name;
        }
        if let Some(duration) = update.duration {
            self.duration = duration;
        }
        if let Some(size) = update.max_group_size {
            self.max_group_size = size;
        }
        if let Some(difficulty) = update.difficulty {
            self.difficulty = difficulty.parse()?;
        }
        if let Some(avg) = update.ratings_average {
            self.ratings_average = avg;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(discount) = update.price_discount {
            self.price_discount = Some(discount);
        }
        if let Some(summary) = update.summary {
            self.summary = summary.trim().to_string();
        }
        if let Some(description) = update.description {
            self.description = Some(description.trim().to_string());
        }
        if let Some(cover) = update.image_cover {
            self.image_cover = cover;
        }
        if let Some(images) = update.images {
            self.images = images;
        }
        if let Some(dates) = update.start_dates {
            self.start_dates = dates;
        }
        if let Some(secret) = update.secret_tour {
            self.secret_tour = secret;
        }
        self.validate()
    }

    fn validate(&self) -> DomainResult<()> {
        // Bounds are in characters, not bytes; multibyte names count once
        // per character.
        let name_chars = self.name.chars().count();
        if name_chars > NAME_MAX_LEN {
            return Err(DomainError::validation(
                "A tour must have less or equal than 40 characters",
            ));
        }
        if name_chars < NAME_MIN_LEN {
            return Err(DomainError::validation(
                "A tour must have more or equal than 5 characters",
            ));
        }
        if self.ratings_average < 1.0 {
            return Err(DomainError::validation("Rating must be above 1.0"));
        }
        if self.ratings_average > 5.0 {
            return Err(DomainError::validation("Rating must be below 5.0"));
        }
        if let Some(discount) = self.price_discount {
            if discount >= self.price {
                return Err(DomainError::validation(format!(
                    "Discount price ({discount}) can not be more than actual price"
                )));
            }
        }
        if self.summary.is_empty() {
            return Err(DomainError::validation("A tour must have a description"));
        }
        Ok(())
    }
}

fn required_trimmed(value: Option<String>, message: &str) -> DomainResult<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(DomainError::validation(message)),
    }
}

/// Lowercased, hyphen-separated slug of a tour name.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_dash = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash {
            slug.push('-');
            last_was_dash = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}
