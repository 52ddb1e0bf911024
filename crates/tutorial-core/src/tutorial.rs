//! # Tutorial Record and Payloads
//!
//! The [`Tutorial`] is the sole managed resource. It is created from a
//! [`NewTutorial`] and mutated only through a [`TutorialPatch`]; both run
//! their validation before touching the record.
//!
//! ## Wire Format
//!
//! Records serialize with camelCase keys:
//!
//! ```json
//! { "id": "…", "title": "…", "description": null, "published": false,
//!   "createdAt": "…", "updatedAt": "…" }
//! ```

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ValidationError;

/// Unique identifier for a tutorial. Generated on creation, never changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct TutorialId(Uuid);

impl TutorialId {
    /// Create a new random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TutorialId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TutorialId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TutorialId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| ValidationError::InvalidId(s.to_string()))
    }
}

/// A stored tutorial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tutorial {
    /// Store-generated identifier.
    pub id: TutorialId,
    /// Display title. Never blank.
    pub title: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Whether the tutorial is visible in the published listing.
    pub published: bool,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last modified.
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a tutorial.
///
/// `title` is optional at the type level so that a missing title is a
/// [`ValidationError::MissingTitle`] rather than a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NewTutorial {
    /// Required title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Publication flag; `false` when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
}

impl NewTutorial {
    /// Check the payload without consuming it.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.title {
            None => Err(ValidationError::MissingTitle),
            Some(title) if title.trim().is_empty() => Err(ValidationError::EmptyTitle),
            Some(_) => Ok(()),
        }
    }

    /// Build a new record with a fresh identifier, stamped at `now`.
    pub fn into_tutorial(self, now: DateTime<Utc>) -> Result<Tutorial, ValidationError> {
        self.validate()?;
        let title = self.title.ok_or(ValidationError::MissingTitle)?;
        Ok(Tutorial {
            id: TutorialId::new(),
            title,
            description: self.description,
            published: self.published.unwrap_or(false),
            created_at: now,
            updated_at: now,
        })
    }
}

/// Partial update of a tutorial's mutable fields. Absent fields are left
/// untouched.
///
/// `description` distinguishes an absent key (`None`, keep) from an
/// explicit `null` (`Some(None)`, clear).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TutorialPatch {
    /// New title; must not be blank when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description; `null` clears it.
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    /// New publication flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
}

impl TutorialPatch {
    /// Check the patch without applying it.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.title {
            Some(title) if title.trim().is_empty() => Err(ValidationError::EmptyTitle),
            _ => Ok(()),
        }
    }

    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.published.is_none()
    }

    /// Apply the patch to `tutorial`, bumping `updated_at` to `now`.
    ///
    /// The record is left untouched when validation fails.
    pub fn apply(&self, tutorial: &mut Tutorial, now: DateTime<Utc>) -> Result<(), ValidationError> {
        self.validate()?;
        if let Some(title) = &self.title {
            tutorial.title = title.clone();
        }
        if let Some(description) = &self.description {
            tutorial.description = description.clone();
        }
        if let Some(published) = self.published {
            tutorial.published = published;
        }
        tutorial.updated_at = now;
        Ok(())
    }
}

/// Any value that reaches the deserializer, `null` included, means the key
/// was present; `#[serde(default)]` covers the absent case.
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
