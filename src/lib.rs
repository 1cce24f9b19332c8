#![forbid(unsafe_code)]

pub mod classify;
pub mod cli;
pub mod config;
pub mod enrich;
pub mod logging;
pub mod page;
pub mod server;
pub mod stream;
pub mod youtube;
