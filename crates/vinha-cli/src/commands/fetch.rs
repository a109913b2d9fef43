use vinha_core::error::VinhaError;
use vinha_core::model::{ReportKind, ReportQuery};

use super::UpstreamArgs;
use crate::output;

pub fn run(
    kind: ReportKind,
    year: i32,
    category: Option<&str>,
    output_format: &str,
    upstream: &UpstreamArgs,
) -> Result<(), VinhaError> {
    let query = ReportQuery::new(year, kind, category)?;
    let source = upstream.source()?;
    let result = vinha_core::fetch_report(&query, &source)?;

    match output_format {
        "json" => output::json::print(&result)?,
        _ => output::table::print(&query, &result),
    }

    Ok(())
}
