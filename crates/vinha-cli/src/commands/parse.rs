use std::path::PathBuf;
use vinha_core::error::VinhaError;
use vinha_core::model::{ReportKind, ReportQuery};

use crate::output;

pub fn run(
    html_file: PathBuf,
    kind: ReportKind,
    year: i32,
    category: Option<&str>,
    output_format: &str,
) -> Result<(), VinhaError> {
    let query = ReportQuery::new(year, kind, category)?;
    let html = std::fs::read_to_string(&html_file)?;
    let result = vinha_core::parse_report(&query, &html)?;

    match output_format {
        "json" => output::json::print(&result)?,
        _ => output::table::print(&query, &result),
    }

    Ok(())
}
