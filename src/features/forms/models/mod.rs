mod form;
mod question;

pub use form::Form;
pub use question::{Question, QuestionOption, QuestionType};
