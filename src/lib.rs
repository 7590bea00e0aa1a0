// Thematic: topic discovery for plain text
//
// This is the library root. Text goes through the chunker and normalizer,
// the topic model clusters the chunks, and the pipeline joins topics back
// onto the original text.

pub mod config;
pub mod output;
pub mod pipeline;
pub mod resources;
pub mod status;
pub mod text;
pub mod topics;

#[cfg(feature = "web")]
pub mod web;
