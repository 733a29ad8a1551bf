pub mod api;
pub mod config;
pub mod docs;
pub mod error;
pub mod leave;
pub mod model;
pub mod routes;
pub mod store;
