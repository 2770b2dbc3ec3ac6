//! # Integration Tests
//!
//! - flows: gadget, adapters and the shared bus working together
//! - concurrency: concurrent propagation over shared records

pub mod concurrency;
