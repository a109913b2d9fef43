use crate::model::RawRow;

pub const ITEM_CLASS: &str = "tb_item";
pub const SUBITEM_CLASS: &str = "tb_subitem";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRole {
    GroupHeader,
    ChildEntry,
    Skip,
}

/// Decide a row's role from its structure alone.
///
/// Only two-cell rows take part in grouping; the first cell's class tells
/// a category row from an indented sub-row.
pub fn classify(row: &RawRow) -> RowRole {
    let [first, _] = row.cells.as_slice() else {
        return RowRole::Skip;
    };
    match first.style.as_deref() {
        Some(ITEM_CLASS) => RowRole::GroupHeader,
        Some(SUBITEM_CLASS) => RowRole::ChildEntry,
        _ => RowRole::Skip,
    }
}
