//! Unit tests for the chat context.
