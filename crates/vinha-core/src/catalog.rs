//! Static mapping from report kinds and categories to the opaque
//! `opcao` / `subopcao` codes the Vitibrasil site expects.

use crate::error::VinhaError;
use crate::model::ReportKind;

pub const DEFAULT_UPSTREAM_URL: &str = "http://vitibrasil.cnpuv.embrapa.br/index.php";

/// A sub-report selectable by category name.
#[derive(Debug, PartialEq, Eq)]
pub struct Subreport {
    pub category: &'static str,
    pub code: &'static str,
}

const fn sub(category: &'static str, code: &'static str) -> Subreport {
    Subreport { category, code }
}

const PROCESSING: &[Subreport] = &[
    sub("vinifera", "subopt_01"),
    sub("americans", "subopt_02"),
    sub("table", "subopt_03"),
    sub("unclassified", "subopt_04"),
];

const IMPORT: &[Subreport] = &[
    sub("table", "subopt_01"),
    sub("sparkling", "subopt_02"),
    sub("fresh", "subopt_03"),
    sub("raisins", "subopt_04"),
    sub("juice", "subopt_05"),
];

const EXPORT: &[Subreport] = &[
    sub("table", "subopt_01"),
    sub("sparkling", "subopt_02"),
    sub("fresh", "subopt_03"),
    sub("juice", "subopt_04"),
];

pub fn option_code(kind: ReportKind) -> &'static str {
    match kind {
        ReportKind::Production => "opt_02",
        ReportKind::Processing => "opt_03",
        ReportKind::Commercialization => "opt_04",
        ReportKind::Import => "opt_05",
        ReportKind::Export => "opt_06",
    }
}

/// Categories accepted by `kind`. Empty for reports without sub-reports.
pub fn subreports(kind: ReportKind) -> &'static [Subreport] {
    match kind {
        ReportKind::Processing => PROCESSING,
        ReportKind::Import => IMPORT,
        ReportKind::Export => EXPORT,
        ReportKind::Production | ReportKind::Commercialization => &[],
    }
}

/// Look up the sub-report for `category`.
///
/// Category names match exactly; the set is part of the public URL scheme.
pub fn resolve(
    kind: ReportKind,
    category: Option<&str>,
) -> Result<Option<&'static Subreport>, VinhaError> {
    let table = subreports(kind);
    if table.is_empty() {
        return Ok(None);
    }
    let Some(category) = category else {
        return Err(VinhaError::MissingCategory { kind });
    };
    table
        .iter()
        .find(|s| s.category == category)
        .map(Some)
        .ok_or_else(|| VinhaError::InvalidCategory {
            kind,
            category: category.to_string(),
        })
}
