//! End-to-end flow tests over the in-memory store.

mod helpers;

mod access_test;
mod auth_test;
mod enrollment_test;
