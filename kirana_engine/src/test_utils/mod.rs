//! Helpers for integration tests. Only compiled with the `test_utils` feature.

pub mod callbacks;
pub mod mock_gateway;
pub mod prepare_env;
