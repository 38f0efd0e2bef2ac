mod registration;
mod volunteer;

pub use registration::{EventRegistration, FormPhase, FormResponse, ResponseDetail};
pub use volunteer::Volunteer;
