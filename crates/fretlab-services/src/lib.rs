//! fretlab-services: Session wiring around the fretboard selection model

pub mod assignment;
pub mod intent;
pub mod session;

pub use assignment::AssignmentDraft;
pub use intent::SelectionIntent;
pub use session::{InstrumentSession, NoteBatch, SessionError};
