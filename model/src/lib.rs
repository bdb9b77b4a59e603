//! Domain records and transfer objects for the clubhouse service.
//!
//! Two small domains live side by side:
//! - **library**: authors, publishers, categories, books and libraries
//! - **league**: coaches, leagues, teams, players and matches
//!
//! Records are plain attribute holders without an identifier. A record that
//! has been persisted is wrapped in [`Entity`], which carries the identifier
//! the store assigned. Transfer objects ([`dto`]) are the boundary-facing
//! shapes; they carry associations as bare identifiers.

pub mod dto;
pub mod records;
pub mod validation;

pub use dto::*;
pub use records::*;
pub use validation::{FieldErrors, Validate};

/// Store-assigned identifier. Immutable once assigned.
pub type Id = i64;

/// A record as it exists in the store: its identifier plus its attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity<T> {
    pub id: Id,
    pub data: T,
}

impl<T> Entity<T> {
    pub fn new(id: Id, data: T) -> Self {
        Self { id, data }
    }
}

/// Common behaviour of every domain record.
pub trait Record: Clone + Send + Sync + 'static {
    /// Human-readable entity kind, used for error context ("Team", "Book").
    const KIND: &'static str;
}

/// Records whose only attribute is a name.
pub trait NamedRecord: Record {
    fn from_name(name: String) -> Self;
    fn name(&self) -> &str;
}
