//! The merge engine and its configuration types.

mod directive;
mod engine;
mod strategy;

pub use directive::{DirectiveSpec, Directives};
pub use engine::{DataPayload, EntityMerger};
pub use strategy::AssociationStrategy;
