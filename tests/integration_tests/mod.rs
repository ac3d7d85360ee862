//! Integration tests module
//!
//! End-to-end tests for wordpulse:
//! - Snapshot ingestion through the facade and every analysis read path
//! - The ingestion scheduler driven by file and scripted providers
//! - Failure handling and recovery scenarios

pub mod error_scenarios;
pub mod fixtures;
pub mod pipeline_test;
pub mod scheduler_test;
