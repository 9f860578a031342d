//! Shared test utilities for the crules workspace.
//!
//! This crate is a dev-dependency only and is never published.
//!
//! # Modules
//!
//! - [`git`]: real git repositories and bare remotes seeded with rule files
//! - [`workspace`]: [`TestWorkspace`], a temporary home plus project directory
//! - [`fake`]: [`FakeVcs`], a scripted in-memory version-control collaborator

pub mod fake;
pub mod git;
pub mod workspace;

pub use fake::FakeVcs;
pub use workspace::TestWorkspace;
