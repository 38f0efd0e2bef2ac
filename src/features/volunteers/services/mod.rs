mod registration_service;
mod volunteer_service;

pub use registration_service::RegistrationService;
pub use volunteer_service::VolunteerService;
