use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::VinhaError;
use crate::model::{Group, RawTable, ReportQuery, TradeRecord, TradeTotals};
use crate::parsing::{self, GroupShape};

/// The JSON payload returned for a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportResult {
    Grouped(GroupedReport),
    Trade(TradeReport),
}

/// Production, processing or commercialization data.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedReport {
    pub year: i32,
    pub category: Option<&'static str>,
    /// Raw footer value, e.g. "200.000.000".
    pub total: Option<String>,
    pub shape: GroupShape,
    pub groups: Vec<Group>,
}

/// Import or export data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeReport {
    pub data: Vec<TradeRecord>,
    pub total: Option<TradeTotals>,
}

/// Turn an extracted table into the payload for `query`.
pub fn assemble(query: &ReportQuery, table: &RawTable) -> Result<ReportResult, VinhaError> {
    match GroupShape::for_kind(query.kind) {
        Some(shape) => {
            let footer = parsing::grouped_footer(table.footer.as_ref())?;
            if footer.is_none() {
                warn!(kind = %query.kind, year = query.year, "table has no totals footer");
            }
            Ok(ReportResult::Grouped(GroupedReport {
                year: query.year,
                category: query.category(),
                total: footer,
                shape,
                groups: parsing::build(&table.body),
            }))
        }
        None => {
            let totals = parsing::trade_totals(table.footer.as_ref())?;
            if totals.is_none() {
                warn!(kind = %query.kind, year = query.year, "table has no totals footer");
            }
            Ok(ReportResult::Trade(TradeReport {
                data: parsing::parse_trade(&table.body)?,
                total: totals,
            }))
        }
    }
}

impl Serialize for GroupedReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("ano", &self.year)?;
        map.serialize_entry("total", &self.total)?;
        if let Some(category) = self.category {
            map.serialize_entry("categoria", category)?;
        }
        match self.shape {
            GroupShape::Keyed { value_field } => {
                map.serialize_entry("dados", &keyed_groups(&self.groups, value_field))?;
            }
            GroupShape::Nested { .. } => {
                let nested: Vec<NestedGroup> = self
                    .groups
                    .iter()
                    .map(|group| NestedGroup {
                        group,
                        shape: self.shape,
                    })
                    .collect();
                map.serialize_entry("dados", &nested)?;
            }
        }
        map.end()
    }
}

/// `{label: {value_field: value, child: value, ...}}`. A repeated label
/// replaces the earlier entry in place.
fn keyed_groups(groups: &[Group], value_field: &str) -> Map<String, Value> {
    let mut out = Map::new();
    for group in groups {
        let mut entry = Map::new();
        entry.insert(value_field.to_string(), Value::String(group.value.clone()));
        for child in &group.children {
            entry.insert(child.label.clone(), Value::String(child.value.clone()));
        }
        out.insert(group.label.clone(), Value::Object(entry));
    }
    out
}

struct NestedGroup<'a> {
    group: &'a Group,
    shape: GroupShape,
}

impl Serialize for NestedGroup<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let GroupShape::Nested {
            header_field,
            value_field,
            children_field,
            child_field,
        } = self.shape
        else {
            return Err(serde::ser::Error::custom("keyed shape in nested rendering"));
        };

        let children: Vec<Map<String, Value>> = self
            .group
            .children
            .iter()
            .map(|child| {
                let mut m = Map::new();
                m.insert(child_field.to_string(), Value::String(child.label.clone()));
                m.insert(value_field.to_string(), Value::String(child.value.clone()));
                m
            })
            .collect();

        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry(header_field, &self.group.label)?;
        map.serialize_entry(value_field, &self.group.value)?;
        map.serialize_entry(children_field, &children)?;
        map.end()
    }
}
