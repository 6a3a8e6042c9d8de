//! Course, chapter, and video management.

pub mod service;

pub use service::CatalogService;
