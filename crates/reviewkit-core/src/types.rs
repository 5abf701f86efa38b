use crate::{ReviewKitError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Provider categories that carry reviews in the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderKind {
    Therapist,
    Place,
    FacialPlace,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProviderKind::Therapist => "therapist",
            ProviderKind::Place => "place",
            ProviderKind::FacialPlace => "facial-place",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "therapist" => Ok(ProviderKind::Therapist),
            "place" => Ok(ProviderKind::Place),
            "facial-place" | "facial_place" => Ok(ProviderKind::FacialPlace),
            other => Err(format!("unknown provider kind: {}", other)),
        }
    }
}

/// Composite cache key: one entry per provider per kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReviewKey {
    pub provider_id: String,
    pub kind: ProviderKind,
}

impl ReviewKey {
    pub fn new(provider_id: impl Into<String>, kind: ProviderKind) -> Self {
        Self {
            provider_id: provider_id.into().trim().to_string(),
            kind,
        }
    }
}

impl fmt::Display for ReviewKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.provider_id)
    }
}

/// A moderator-approved review as delivered by the remote store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealReview {
    pub id: String,
    pub provider_id: String,
    pub kind: ProviderKind,
    pub rating: u8,
    pub text: String,
    pub reviewer_name: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl RealReview {
    /// Builds a review from a raw store document, consulting alternate field
    /// names in order (`reviewContent` > `comment` > `reviewText` > `text`,
    /// `reviewerName` > `userName`, ...). Every field except the id absorbs
    /// missing or malformed values with a default; a document carrying no id
    /// candidate at all is rejected.
    pub fn from_document(doc: &Value, kind: ProviderKind) -> Result<Self> {
        let id = string_field(doc, &["$id", "id", "reviewId"]).ok_or_else(|| {
            ReviewKitError::MalformedDocument("review document has no id".to_string())
        })?;

        let text =
            string_field(doc, &["reviewContent", "comment", "reviewText", "text"]).unwrap_or_default();
        let reviewer_name = string_field(doc, &["reviewerName", "userName"])
            .unwrap_or_else(|| "Anonymous".to_string());
        let avatar_url = string_field(doc, &["avatar", "avatarUrl"]);
        let provider_id =
            string_field(doc, &["providerId", "therapistId", "placeId"]).unwrap_or_default();
        let rating = doc
            .get("rating")
            .and_then(Value::as_f64)
            .map(|r| (r.round() as i64).clamp(1, 5) as u8)
            .unwrap_or(5);
        let created_at = string_field(doc, &["reviewDate", "createdAt", "$createdAt"])
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(Utc::now);

        Ok(Self {
            id,
            provider_id,
            kind,
            rating,
            text,
            reviewer_name,
            avatar_url,
            created_at,
        })
    }
}

fn string_field(doc: &Value, names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| {
        doc.get(*name)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

/// A synthesized filler review. Never persisted, always flagged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedReview {
    pub id: String,
    pub rating: u8,
    pub text: String,
    pub reviewer_name: String,
    pub avatar_url: String,
    pub created_at: DateTime<Utc>,
    pub is_seed: bool,
}

impl SeedReview {
    pub fn new(
        id: String,
        rating: u8,
        text: String,
        reviewer_name: String,
        avatar_url: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            rating,
            text,
            reviewer_name,
            avatar_url,
            created_at,
            is_seed: true,
        }
    }
}

/// The uniform item the UI renders, real or synthetic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayReview {
    pub id: String,
    pub rating: u8,
    pub text: String,
    pub reviewer_name: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub is_seed: bool,
}

impl From<RealReview> for DisplayReview {
    fn from(review: RealReview) -> Self {
        Self {
            id: review.id,
            rating: review.rating,
            text: review.text,
            reviewer_name: review.reviewer_name,
            avatar_url: review.avatar_url,
            created_at: review.created_at,
            is_seed: false,
        }
    }
}

impl From<SeedReview> for DisplayReview {
    fn from(review: SeedReview) -> Self {
        Self {
            id: review.id,
            rating: review.rating,
            text: review.text,
            reviewer_name: review.reviewer_name,
            avatar_url: Some(review.avatar_url),
            created_at: review.created_at,
            is_seed: review.is_seed,
        }
    }
}

/// Aggregate rating figures for a review list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    /// Mean rating rounded to one decimal, 0.0 when empty.
    pub average_rating: f64,
    pub total_reviews: usize,
    /// Counts per star, index 0 = one star.
    pub distribution: [usize; 5],
}

impl ReviewSummary {
    pub fn from_reviews(reviews: &[DisplayReview], include_seeds: bool) -> Self {
        let mut distribution = [0usize; 5];
        let mut sum = 0u32;
        let mut total = 0usize;

        for review in reviews {
            if !include_seeds && review.is_seed {
                continue;
            }
            let rating = review.rating.clamp(1, 5);
            distribution[rating as usize - 1] += 1;
            sum += rating as u32;
            total += 1;
        }

        let average_rating = if total == 0 {
            0.0
        } else {
            (sum as f64 / total as f64 * 10.0).round() / 10.0
        };

        Self {
            average_rating,
            total_reviews: total,
            distribution,
        }
    }
}

/// Coarse clock used to rotate synthetic content: index of a fixed-width
/// window since the epoch. Recomputed on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeBucket(pub u64);

impl TimeBucket {
    pub fn at(time: SystemTime, period: Duration) -> Self {
        let secs = time
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_secs();
        TimeBucket(secs / period.as_secs().max(1))
    }

    pub fn current(period: Duration) -> Self {
        Self::at(SystemTime::now(), period)
    }

    /// Unix timestamp of the start of this bucket.
    pub fn start_timestamp(&self, period: Duration) -> i64 {
        (self.0 * period.as_secs().max(1)) as i64
    }
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
