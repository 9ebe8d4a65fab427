//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate storage file details from service/business orchestration.
//!
//! # Invariants
//! - The repository is the only component that reads or writes the storage
//!   file.
//! - Lookups and mutations report absent targets as `None`; `RepoError` is
//!   reserved for storage faults.

pub mod article_repo;
