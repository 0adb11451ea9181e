//! Manuscript Engine: deterministic short-read manuscript synthesis.
//!
//! Turns a five-field brief (working title, core idea, audience, tone, page
//! count) into a complete Kindle short-read draft: a publishing blueprint,
//! chapter architecture, page-by-page content, formatting guidance, and a
//! marketing launch kit. Text comes from weighted template tables, never
//! from a language model, so identical briefs always produce identical
//! manuscripts.

pub mod core;
pub mod schema;

pub use crate::core::pipeline::{assemble, ManuscriptEngine, PipelineError};
pub use crate::schema::brief::{ManuscriptInputs, RawBrief};
pub use crate::schema::manuscript::Manuscript;
