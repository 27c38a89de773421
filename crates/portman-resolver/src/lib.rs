//! Dependency resolution engine: feature-aware discovery of the transitive
//! package graph through an external query, followed by a post-order walk
//! that yields a linear install (or removal) order.

pub mod graph;
pub mod needed;
pub mod order;
pub mod query;
pub mod resolver;

pub use query::{DependencyQuery, InstallOutcome, RemovalOutcome, RemovalQuery};
pub use resolver::{order_for_removal, resolve, ResolverEngine};
