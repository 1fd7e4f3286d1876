//! Unit tests for the SMS module

pub mod mock_provider_tests;
