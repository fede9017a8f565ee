//! Domain rules of the mentorship service: suggestion statuses, validation
//! and the negotiation state machine. Nothing in here does I/O.

pub mod error;
pub mod person;
pub mod progress;
pub mod resolver;
pub mod status;
pub mod suggestion;
pub mod transition;
pub mod validation;

pub use error::DomainError;
pub use progress::{Progress, ProgressEdit};
pub use resolver::Competition;
pub use status::{Party, SuggestionStatus};
pub use suggestion::{Suggestion, ThemeSnapshot};
pub use transition::{apply_transition, transition_to, SideEffect, Snapshot, ThemeMerge, Transition};
