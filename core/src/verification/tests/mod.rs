//! Verification service tests

mod service_tests;
