//! Repository implementations.
//!
//! Concrete implementations of domain repository traits. Records live only in
//! process memory and are dropped on restart.
//!
//! # Repositories
//!
//! - [`InMemoryLinkRepository`] - Link storage and click history

pub mod memory_link_repository;

pub use memory_link_repository::InMemoryLinkRepository;
