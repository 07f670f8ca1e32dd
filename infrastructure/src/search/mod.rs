//! Semantic game search
//!
//! Board games are embedded once, when the index is built, as
//! `"{name} - {category} game"`. Queries are embedded the same way and
//! ranked by cosine similarity.

mod embedding;
mod index;

pub use embedding::{DIMENSIONS, cosine_similarity, embed};
pub use index::{GameSearchIndex, MAX_RESULTS};
