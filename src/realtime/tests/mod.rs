//! Unit tests for the real-time layer.
