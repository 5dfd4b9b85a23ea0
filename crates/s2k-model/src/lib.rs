//! Identifier remapping and summaries derived from an extracted S2K model.

mod remap;
mod summary;

pub use remap::{
    DEFAULT_PROPERTY_ID, ElementsBySection, NodeIdMap, SectionLookup, SectionPropertyMap,
    UNASSIGNED_SECTION, compare_numeric_ids,
};
pub use summary::ModelSummary;
