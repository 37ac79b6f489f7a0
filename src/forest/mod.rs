//! Forest builder: flat task records -> nested task trees.

mod build;
mod types;

pub use build::{build_flat_list, build_forest, build_tree};
pub use types::*;
