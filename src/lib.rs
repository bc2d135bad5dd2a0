#![recursion_limit = "256"]

//! Support-ticket triage core: a fine-tunable transformer text
//! classifier that maps free-text customer queries to a fixed set
//! of product categories, with weight persistence and ranked
//! inference. The surrounding web/CRUD system consumes this crate
//! through [`application::service::TriageService`].

pub mod application;
pub mod cli;
pub mod data;
pub mod domain;
pub mod infra;
pub mod ml;
