mod form_service;

pub use form_service::FormService;
