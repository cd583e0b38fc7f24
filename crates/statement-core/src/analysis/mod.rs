pub mod augment;
pub mod layout;

pub use augment::{
    augment, augment_with, growth, share, AnalysisColumn, AnalysisKind, AnalysisProfile,
    AugmentedStatement, ShareAnchor,
};
pub use layout::{column_order, ColumnOrder, ColumnRef};
