//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod embedder;
pub mod exchange_logger;
pub mod llm_gateway;
pub mod progress;
pub mod repository;
pub mod speech;
pub mod task_scheduler;
