//! Enrollment approval lifecycle and derived counter reconciliation.

pub mod lifecycle;
pub mod reconciler;

pub use lifecycle::EnrollmentLifecycle;
pub use reconciler::{CounterReconciler, ReconcileReport};
