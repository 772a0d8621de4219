//! Unit tests for the issue context.
