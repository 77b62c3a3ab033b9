//! cherrytree - label-driven cherry-picking for release branches
//!
//! Reconciles the pull requests labeled for a release against the main and
//! release branch histories, and optionally cherry-picks the missing ones
//! onto the release branch.
//!
//! The pipeline:
//! 1. [`pulls`] fetches labeled pull requests from the issue tracker
//! 2. [`index`] maps PR numbers to commits on each branch
//! 3. [`reconcile`] joins both into [`types::Cherry`] records
//! 4. [`apply`] cherry-picks pending cherries with dry-run and conflict handling

pub mod apply;
pub mod auth;
pub mod config;
pub mod error;
pub mod index;
pub mod platform;
pub mod pulls;
pub mod reconcile;
pub mod repo;
pub mod types;
