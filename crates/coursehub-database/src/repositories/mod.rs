//! PostgreSQL repository implementations of the store traits.

pub mod account;
pub mod course;
pub mod enrollment;

pub use account::AccountRepository;
pub use course::CourseRepository;
pub use enrollment::EnrollmentRepository;
