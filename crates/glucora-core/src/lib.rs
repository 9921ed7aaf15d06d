// SPDX-FileCopyrightText: 2026 Glucora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Glucora tiered answer engine.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Glucora workspace. The engine crates are
//! written against the capability traits defined here; concrete adapters
//! implement them.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::GlucoraError;
pub use types::{
    AdapterType, ConditionType, ConversationTurn, CostTier, DiabetesProfile, EvidenceQuality,
    GenerationRequest, HealthStatus, ProcessingTier, Question, RateLimitInfo, ResearchSummary,
    ResponseEnvelope, ResponseMetadata, RoutingDecision, SessionId, SourceClass, SourceRef,
    SourceSnippet, Tier, TierResult, UsageSnapshot,
};

// Re-export all capability traits at crate root.
pub use traits::{
    CapabilityAdapter, CounterAdapter, EventSink, GenerateAdapter, NullSink,
    RetrieveAdapter, TextStream,
};
