//! `corebank-api` — HTTP surface for the account service.

pub mod app;
pub mod context;
pub mod middleware;
