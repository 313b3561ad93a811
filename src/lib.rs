//! Train-evaluate-log pipeline: load a delimited numeric dataset,
//! split it, fit a ridge regression, score it on the held-out rows
//! and record metrics, plot and model for the run.

pub mod cli;
pub mod application;
pub mod domain;
pub mod data;
pub mod ml;
pub mod infra;
