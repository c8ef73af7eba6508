//! Web search implementations

mod serpapi;

pub use serpapi::SerpApiSearch;
