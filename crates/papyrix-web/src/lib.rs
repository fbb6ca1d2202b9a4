//! papyrix-web — HTTP front end: upload a PDF, get back a summary,
//! suggested questions, and (optionally) an answer.

pub mod handlers;
pub mod router;
pub mod state;
