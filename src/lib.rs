//! skillsync - keep a local skills folder in sync with skill repositories
//!
//! Sources (git repositories, folders inside them, skills.sh links and local
//! directories) are registered once per profile and checked out into a shared
//! cache. Each workspace picks which discovered skills are enabled, and the
//! enabled skills are copied into its destination folder.
//!
//! The main entry points:
//! - [`source::reference::resolve`]: turn user input into a repository reference
//! - [`sync::Synchronizer`]: clone or update a checkout with credential fallback
//! - [`discovery::discover`]: find skill bundles in a checkout
//! - [`materialize::Materializer`]: converge the destination to the enabled set
//! - [`workspace::Workspace`]: all of the above for one workspace root

pub mod activation;
pub mod cli;
pub mod commands;
pub mod common;
pub mod config;
pub mod discovery;
pub mod error;
pub mod git;
pub mod hash;
pub mod materialize;
pub mod progress;
pub mod selection;
pub mod source;
pub mod state;
pub mod sync;
pub mod workspace;

pub use error::{Result, SkillsyncError};
