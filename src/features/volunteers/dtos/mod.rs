mod registration_dto;
mod volunteer_dto;

pub use registration_dto::*;
pub use volunteer_dto::*;
