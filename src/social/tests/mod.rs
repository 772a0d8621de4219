//! Unit tests for the social context.
