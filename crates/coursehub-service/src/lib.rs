//! # coursehub-service
//!
//! Business logic services for CourseHub.
//!
//! ## Modules
//!
//! - `catalog` — course, chapter, and video management
//! - `enrollment` — the enrollment approval lifecycle and the derived
//!   counter reconciler
//! - `playback` — policy-gated issuance of signed playback tokens

pub mod catalog;
pub mod enrollment;
pub mod playback;

pub use catalog::CatalogService;
pub use enrollment::{CounterReconciler, EnrollmentLifecycle, ReconcileReport};
pub use playback::PlaybackService;
