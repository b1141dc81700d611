//! Contact store integration tests.

mod lifecycle;
