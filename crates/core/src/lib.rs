//! # TESS Core
//!
//! Domain types, traits, and error definitions for the TESS dossier assistant.
//! This crate has **zero framework dependencies**: it defines the state model
//! (Dossier, Patch, Outcome) and the seams (Tool, Provider, DossierStore) that
//! all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Tools never mutate a [`Dossier`]. They read it and return an [`Outcome`]
//! whose optional [`Patch`] is applied later by a single writer, in request
//! order. Everything else in the workspace depends inward on this crate.

pub mod document;
pub mod dossier;
pub mod error;
pub mod event;
pub mod message;
pub mod outcome;
pub mod patch;
pub mod provider;
pub mod store;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use document::Document;
pub use dossier::{Dossier, DossierId};
pub use error::{Error, Result};
pub use event::{DomainEvent, EventBus};
pub use message::{Message, MessageToolCall, Role};
pub use outcome::Outcome;
pub use patch::Patch;
pub use provider::{Provider, ProviderRequest, ProviderResponse, ResponseFormat, ToolDefinition};
pub use store::DossierStore;
pub use tool::{Tool, ToolCall, ToolRegistry};
