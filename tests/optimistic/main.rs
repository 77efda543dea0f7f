//! Optimistic cache integration tests.
