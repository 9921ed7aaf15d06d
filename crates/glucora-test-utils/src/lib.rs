// SPDX-FileCopyrightText: 2026 Glucora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted adapters and sinks for testing the Glucora engine.
//!
//! Every mock implements the same capability traits the real adapters do, so
//! tests exercise the engine through the exact seams production uses.
//! Generators and retrievers are scripted FIFO: queue responses in the order
//! the code under test will consume them.

pub mod counter;
pub mod generator;
pub mod retriever;
pub mod sink;

pub use counter::FailingCounter;
pub use generator::{FailingGenerator, MockGenerator};
pub use retriever::{FailingRetriever, MockRetriever, snippet};
pub use sink::CollectingSink;
