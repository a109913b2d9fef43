pub mod classify;
pub mod values;

use crate::error::VinhaError;
use crate::model::{ChildEntry, Group, RawCell, RawRow, ReportKind, TradeRecord, TradeTotals};
use classify::{classify, RowRole};
use tracing::{debug, warn};
use values::normalize;

/// Field names a grouped report uses when rendered to JSON.
///
/// The row walk is the same for every grouped report; only these labels
/// differ between production, processing and commercialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupShape {
    /// Groups become object keys; children become sibling keys of the value.
    Keyed { value_field: &'static str },
    /// Groups become objects in an array with a nested array of children.
    Nested {
        header_field: &'static str,
        value_field: &'static str,
        children_field: &'static str,
        child_field: &'static str,
    },
}

pub const PRODUCTION_SHAPE: GroupShape = GroupShape::Keyed {
    value_field: "Quantidade (L.)",
};

pub const PROCESSING_SHAPE: GroupShape = GroupShape::Nested {
    header_field: "Categoria",
    value_field: "Quantidade (Kg)",
    children_field: "Subcategorias",
    child_field: "Cultivar",
};

pub const COMMERCIALIZATION_SHAPE: GroupShape = GroupShape::Nested {
    header_field: "Produto",
    value_field: "Quantidade (L)",
    children_field: "Subtipos",
    child_field: "Subproduto",
};

impl GroupShape {
    /// Shape for a grouped report, `None` for the flat trade tables.
    pub fn for_kind(kind: ReportKind) -> Option<GroupShape> {
        match kind {
            ReportKind::Production => Some(PRODUCTION_SHAPE),
            ReportKind::Processing => Some(PROCESSING_SHAPE),
            ReportKind::Commercialization => Some(COMMERCIALIZATION_SHAPE),
            ReportKind::Import | ReportKind::Export => None,
        }
    }
}

/// Group category rows and their sub-rows in a single forward pass.
///
/// A sub-row attaches to the latest category row; sub-rows seen before any
/// category are dropped.
pub fn build(rows: &[RawRow]) -> Vec<Group> {
    // The last group is the current one; empty means no category row yet.
    let mut groups: Vec<Group> = Vec::new();

    for row in rows {
        match classify(row) {
            RowRole::GroupHeader => {
                let (label, value) = label_and_value(&row.cells);
                groups.push(Group {
                    label,
                    value,
                    children: Vec::new(),
                });
            }
            RowRole::ChildEntry => {
                let (label, value) = label_and_value(&row.cells);
                match groups.last_mut() {
                    Some(current) => current.children.push(ChildEntry { label, value }),
                    None => debug!(label = %label, "dropping sub-row before any category row"),
                }
            }
            RowRole::Skip => {}
        }
    }

    groups
}

fn label_and_value(cells: &[RawCell]) -> (String, String) {
    let text = |i: usize| cells.get(i).map(|c| c.text.clone()).unwrap_or_default();
    (text(0), text(1))
}

/// Parse the body of an import/export table.
///
/// Cells are read in strides of three (country, quantity, value) regardless
/// of row markup. An incomplete trailing stride is dropped.
pub fn parse_trade(rows: &[RawRow]) -> Result<Vec<TradeRecord>, VinhaError> {
    let cells: Vec<&RawCell> = rows.iter().flat_map(|r| r.cells.iter()).collect();
    let chunks = cells.chunks_exact(3);
    if !chunks.remainder().is_empty() {
        warn!(
            leftover = chunks.remainder().len(),
            "trade table has an incomplete trailing row"
        );
    }

    chunks
        .map(|chunk| -> Result<TradeRecord, VinhaError> {
            Ok(TradeRecord {
                country: chunk[0].text.clone(),
                quantity_kg: normalize(&chunk[1].text)?,
                value_usd: normalize(&chunk[2].text)?,
            })
        })
        .collect()
}

/// Raw grand total of a grouped table: the last cell of its footer.
pub fn grouped_footer(footer: Option<&RawRow>) -> Result<Option<String>, VinhaError> {
    let Some(row) = footer else {
        return Ok(None);
    };
    match row.cells.as_slice() {
        [_, .., value] => Ok(Some(value.text.clone())),
        _ => Err(VinhaError::ParseError(format!(
            "expected at least 2 footer cells, found {}",
            row.cells.len()
        ))),
    }
}

/// Grand totals of an import/export table.
pub fn trade_totals(footer: Option<&RawRow>) -> Result<Option<TradeTotals>, VinhaError> {
    let Some(row) = footer else {
        return Ok(None);
    };
    match row.cells.as_slice() {
        [_, quantity, value] => Ok(Some(TradeTotals {
            total_quantity_kg: normalize(&quantity.text)?,
            total_value_usd: normalize(&value.text)?,
        })),
        _ => Err(VinhaError::ParseError(format!(
            "expected 3 footer cells in trade table, found {}",
            row.cells.len()
        ))),
    }
}
