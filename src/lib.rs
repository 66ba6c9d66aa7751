// Sentimeter: sentiment analysis for reviews and comments.
//
// This is the library root. The single-text flow lives in `analysis`, the
// CSV flow in `batch`; both score text through the `sentiment` trait.

pub mod analysis;
pub mod batch;
pub mod config;
pub mod models;
pub mod output;
pub mod sentiment;

#[cfg(feature = "web")]
pub mod web;
