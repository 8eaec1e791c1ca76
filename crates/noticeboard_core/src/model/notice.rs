//! Notice domain model.
//!
//! # Responsibility
//! - Define the notice record read from and written to the `notices`
//!   collection.
//! - Map between typed documents and notices, normalizing legacy
//!   publication date representations.
//!
//! # Invariants
//! - `Notice::id` comes from the store; `NewNotice` carries no id.
//! - Publication dates are written as store timestamps only.
//! - Reads accept timestamp, RFC 3339 string, `YYYY-MM-DD` string and epoch
//!   millisecond integer for `publicationDate`; anything else reads as `None`.

use crate::repo::document::{Document, DocumentFields, DocumentId, FieldValue, Timestamp};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Collection holding all notices.
pub const NOTICES_COLLECTION: &str = "notices";
pub const TITLE_FIELD: &str = "title";
pub const PUBLICATION_DATE_FIELD: &str = "publicationDate";
pub const CONTENT_FIELD: &str = "content";

/// Store-assigned notice identifier.
pub type NoticeId = DocumentId;

/// Notice as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub id: NoticeId,
    pub title: String,
    /// Normalized publication instant; `None` for missing or unreadable
    /// legacy values.
    pub publication_date: Option<DateTime<Utc>>,
    pub content: String,
}

impl Notice {
    /// Decodes a stored document.
    ///
    /// Missing `title`/`content` read as empty text. A present field of a
    /// non-string type is rejected.
    pub fn from_document(document: &Document) -> Result<Self, NoticeDecodeError> {
        Ok(Self {
            id: document.id,
            title: text_field(document, TITLE_FIELD)?,
            publication_date: document
                .field(PUBLICATION_DATE_FIELD)
                .and_then(normalize_publication_date),
            content: text_field(document, CONTENT_FIELD)?,
        })
    }

    /// Calendar day of the publication date in `tz`.
    pub fn publication_day<Tz: TimeZone>(&self, tz: &Tz) -> Option<NaiveDate> {
        self.publication_date
            .map(|date| date.with_timezone(tz).date_naive())
    }
}

/// Insert payload for a new notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNotice {
    pub title: String,
    pub publication_date: DateTime<Utc>,
    pub content: String,
}

impl NewNotice {
    pub fn new<Tz: TimeZone>(
        title: impl Into<String>,
        publication_date: DateTime<Tz>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            publication_date: publication_date.with_timezone(&Utc),
            content: content.into(),
        }
    }

    /// Checks payload invariants before persistence.
    pub fn validate(&self) -> Result<(), NoticeValidationError> {
        if self.title.trim().is_empty() {
            return Err(NoticeValidationError::BlankTitle);
        }
        Ok(())
    }

    /// Encodes the payload as store fields.
    pub fn to_fields(&self) -> DocumentFields {
        let mut fields = DocumentFields::new();
        fields.insert(TITLE_FIELD.to_string(), self.title.clone().into());
        fields.insert(
            PUBLICATION_DATE_FIELD.to_string(),
            Timestamp::from_datetime(&self.publication_date).into(),
        );
        fields.insert(CONTENT_FIELD.to_string(), self.content.clone().into());
        fields
    }
}

/// Payload rejected before reaching the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoticeValidationError {
    BlankTitle,
    MissingPublicationDate,
    /// Local midnight of the chosen day does not exist in the time zone.
    NonexistentLocalDate(NaiveDate),
}

impl Display for NoticeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "notice title must not be blank"),
            Self::MissingPublicationDate => write!(f, "notice publication date is required"),
            Self::NonexistentLocalDate(date) => {
                write!(f, "midnight of {date} does not exist in the local time zone")
            }
        }
    }
}

impl Error for NoticeValidationError {}

/// Stored document does not have the notice shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeDecodeError {
    pub id: NoticeId,
    pub field: &'static str,
    pub found: &'static str,
}

impl Display for NoticeDecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "notice {} has a {} value in `{}`, expected string",
            self.id, self.found, self.field
        )
    }
}

impl Error for NoticeDecodeError {}

/// Normalizes a stored publication date into a UTC instant.
///
/// Timestamps are converted; legacy strings and epoch milliseconds are
/// parsed as-is. Returns `None` for values that carry no usable instant.
pub fn normalize_publication_date(value: &FieldValue) -> Option<DateTime<Utc>> {
    match value {
        FieldValue::Timestamp(ts) => ts.to_datetime(),
        FieldValue::String(text) => parse_legacy_date(text),
        FieldValue::Integer(millis) => DateTime::from_timestamp_millis(*millis),
        FieldValue::Null | FieldValue::Boolean(_) => None,
    }
}

fn parse_legacy_date(text: &str) -> Option<DateTime<Utc>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

fn text_field(document: &Document, field: &'static str) -> Result<String, NoticeDecodeError> {
    match document.field(field) {
        None | Some(FieldValue::Null) => Ok(String::new()),
        Some(FieldValue::String(value)) => Ok(value.clone()),
        Some(other) => Err(NoticeDecodeError {
            id: document.id,
            field,
            found: other.type_name(),
        }),
    }
}
