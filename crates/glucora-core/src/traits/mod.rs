// SPDX-FileCopyrightText: 2026 Glucora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability adapter traits consumed by the Glucora engine.
//!
//! The engine is written against these traits; concrete adapters
//! (OpenAI-compatible generation, medical search, counter stores) live in
//! their own crates and plug in behind `Arc<dyn ...>`.

pub mod adapter;
pub mod counter;
pub mod generate;
pub mod retrieve;
pub mod sink;

pub use adapter::CapabilityAdapter;
pub use counter::CounterAdapter;
pub use generate::{GenerateAdapter, TextStream};
pub use retrieve::RetrieveAdapter;
pub use sink::{EventSink, NullSink};
