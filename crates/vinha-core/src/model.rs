use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::catalog::{self, Subreport};
use crate::error::VinhaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Production,
    Processing,
    Commercialization,
    Import,
    Export,
}

impl ReportKind {
    pub const ALL: [ReportKind; 5] = [
        ReportKind::Production,
        ReportKind::Processing,
        ReportKind::Commercialization,
        ReportKind::Import,
        ReportKind::Export,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Production => "production",
            ReportKind::Processing => "processing",
            ReportKind::Commercialization => "commercialization",
            ReportKind::Import => "import",
            ReportKind::Export => "export",
        }
    }

    /// Import and export pages are flat country tables rather than grouped ones.
    pub fn is_trade(&self) -> bool {
        matches!(self, ReportKind::Import | ReportKind::Export)
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        ReportKind::ALL
            .into_iter()
            .find(|k| k.as_str() == lower)
            .ok_or_else(|| {
                let names: Vec<&str> = ReportKind::ALL.iter().map(|k| k.as_str()).collect();
                format!("unknown report '{s}'. Available: {}", names.join(", "))
            })
    }
}

/// A validated request for one upstream report page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportQuery {
    pub year: i32,
    pub kind: ReportKind,
    pub subreport: Option<&'static Subreport>,
}

impl ReportQuery {
    /// Validate the category against the catalog for `kind`.
    ///
    /// Production and commercialization ignore the category; the other
    /// reports require one from their fixed set.
    pub fn new(year: i32, kind: ReportKind, category: Option<&str>) -> Result<Self, VinhaError> {
        let subreport = catalog::resolve(kind, category)?;
        Ok(ReportQuery {
            year,
            kind,
            subreport,
        })
    }

    pub fn category(&self) -> Option<&'static str> {
        self.subreport.map(|s| s.category)
    }

    /// Full upstream URL for this query, rooted at `base`.
    pub fn upstream_url(&self, base: &str) -> String {
        let mut url = format!(
            "{base}?ano={}&opcao={}",
            self.year,
            catalog::option_code(self.kind)
        );
        if let Some(sub) = self.subreport {
            url.push_str("&subopcao=");
            url.push_str(sub.code);
        }
        url
    }
}

/// One `<td>` (or `<th>`) of an upstream table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCell {
    pub text: String,
    /// First CSS class of the cell, e.g. `tb_item`.
    pub style: Option<String>,
}

impl RawCell {
    pub fn new(text: impl Into<String>, style: Option<&str>) -> Self {
        RawCell {
            text: text.into(),
            style: style.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawRow {
    pub cells: Vec<RawCell>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawTable {
    pub body: Vec<RawRow>,
    pub footer: Option<RawRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildEntry {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub label: String,
    pub value: String,
    pub children: Vec<ChildEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradeRecord {
    pub country: String,
    #[serde(serialize_with = "serialize_amount")]
    pub quantity_kg: Option<Decimal>,
    #[serde(serialize_with = "serialize_amount")]
    pub value_usd: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradeTotals {
    #[serde(serialize_with = "serialize_amount")]
    pub total_quantity_kg: Option<Decimal>,
    #[serde(serialize_with = "serialize_amount")]
    pub total_value_usd: Option<Decimal>,
}

/// Integral amounts go out as JSON integers, fractional ones as floats.
fn serialize_amount<S: Serializer>(value: &Option<Decimal>, s: S) -> Result<S::Ok, S::Error> {
    match value {
        None => s.serialize_none(),
        Some(d) if d.scale() == 0 => match d.to_i64() {
            Some(i) => s.serialize_i64(i),
            None => s.serialize_f64(d.to_f64().unwrap_or(f64::NAN)),
        },
        Some(d) => s.serialize_f64(d.to_f64().unwrap_or(f64::NAN)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_report_kind_from_str() {
        assert_eq!("Import".parse::<ReportKind>(), Ok(ReportKind::Import));
        assert!("harvest".parse::<ReportKind>().is_err());
    }

    #[test]
    fn test_upstream_url_with_category() {
        let q = ReportQuery::new(2023, ReportKind::Processing, Some("americans")).unwrap();
        assert_eq!(
            q.upstream_url("http://example.test/index.php"),
            "http://example.test/index.php?ano=2023&opcao=opt_03&subopcao=subopt_02"
        );
    }

    #[test]
    fn test_upstream_url_without_category() {
        let q = ReportQuery::new(1999, ReportKind::Production, None).unwrap();
        assert_eq!(
            q.upstream_url("http://example.test/index.php"),
            "http://example.test/index.php?ano=1999&opcao=opt_02"
        );
    }

    #[test]
    fn test_trade_record_amounts() {
        let record = TradeRecord {
            country: "Chile".into(),
            quantity_kg: Some(dec!(100000)),
            value_usd: Some(dec!(50000.00)),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert!(json["quantity_kg"].is_i64());
        assert_eq!(json["quantity_kg"], 100000);
        assert!(json["value_usd"].is_f64());
        assert_eq!(json["value_usd"].as_f64(), Some(50000.0));
    }

    #[test]
    fn test_trade_record_missing_amount_is_null() {
        let record = TradeRecord {
            country: "Peru".into(),
            quantity_kg: None,
            value_usd: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert!(json["quantity_kg"].is_null());
        assert!(json["value_usd"].is_null());
    }
}
