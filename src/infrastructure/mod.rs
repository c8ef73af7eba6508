//! Infrastructure layer: components, services, capability adapters

pub mod components;
pub mod embedding;
pub mod generation;
pub mod http_client;
pub mod logging;
pub mod observability;
pub mod services;
pub mod vector_store;
pub mod web_search;
pub mod workflow;

pub use http_client::{HttpClient, HttpClientTrait};
