//! Structural transforms between a decoded sheet and a markup table
//!
//! - Import: `SheetGrid` → `MarkupTable`, merges become rowspan/colspan
//! - Export: `MarkupTable` → `ValueGrid`, row-major flattening

mod export;
mod import;
mod merge_index;

pub use export::markup_to_grid;
pub use import::grid_to_markup;
pub use merge_index::MergeIndex;
