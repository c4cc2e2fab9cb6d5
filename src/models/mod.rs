mod question;
mod state;

pub use question::{Catalog, CatalogError, Choice, Question};
pub use state::{AnswerRecord, SessionState};

#[cfg(test)]
pub(crate) use question::sample_question;
