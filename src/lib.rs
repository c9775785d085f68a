// src/lib.rs

//! MarkuAPI scraper library
//!
//! Turns Filmarks drama search, listing and detail pages into typed records.
//! Start with [`pipeline::Scraper`].

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;
