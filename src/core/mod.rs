//! Core module containing the record model, value ordering, events and errors

pub mod compare;
pub mod error;
pub mod events;
pub mod field;
pub mod record;

pub use compare::{collate, compare, compare_field, parse_date};
pub use error::{ConfigError, ConfigWarning, FieldUsage, RowsetError, ViewError};
pub use events::{EngineEvent, EventEnvelope, ListEvent, ViewEvent};
pub use field::{DataType, FieldDefinition, FieldValue};
pub use record::{Record, RecordKey};
