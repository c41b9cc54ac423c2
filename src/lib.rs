//! Paginated character browser: fetch a page of an upstream collection,
//! load more by following its `next` links, or replace it with a name search.

pub mod accumulator;
pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod render;
pub mod session;
pub mod types;
