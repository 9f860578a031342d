//! Configuration profiles
//!
//! Two JSON documents (global in the home directory, local in the invoking
//! directory) hold named profiles. [`ConfigStore`] layers them over built-in
//! defaults and performs read-merge-write mutations on one document at a time.

mod backend;
mod document;
mod merge;
mod profile;
mod store;

pub use backend::{DocumentBackend, FileBackend, MemoryBackend, Scope};
pub use document::Document;
pub use merge::{MergedDocuments, ResolvedConfig, derived_cache_dir, merge_documents, resolve};
pub use profile::{
    DEFAULT_ALIAS, DEFAULT_COMMIT_TEMPLATE, PartialProfile, Profile, ProfileKey, is_valid_alias,
};
pub use store::{ConfigStore, CreateOutcome};
