pub mod document_type;
pub mod entity;
pub mod identifier;
pub mod loaders;
pub mod outcome;
pub mod request;

pub use document_type::DocumentType;
pub use entity::{Candidate, EntityStatus, SearchResult};
pub use identifier::{Identifier, IdentifierKind};
pub use loaders::{load_identifiers, parse_identifier_lines};
pub use outcome::{CartReference, FailureReason, Outcome, OutcomeKind, Stage, StatusRecord};
pub use request::RequestSpec;
