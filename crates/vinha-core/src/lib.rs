pub mod catalog;
pub mod error;
pub mod extraction;
pub mod model;
pub mod parsing;
pub mod report;

use error::VinhaError;
use extraction::table::extract_table;
use extraction::ReportSource;
use model::ReportQuery;
use report::ReportResult;

/// Main API entry point: fetch one report page and turn its table into JSON-ready data.
///
/// Issues exactly one upstream request. Category validation happens when the
/// `ReportQuery` is built, so an invalid query never reaches the network.
pub fn fetch_report(
    query: &ReportQuery,
    source: &dyn ReportSource,
) -> Result<ReportResult, VinhaError> {
    let url = query.upstream_url(source.base_url());
    let html = source.fetch(&url)?;
    parse_report(query, &html)
}

/// Parse an already-downloaded report page.
pub fn parse_report(query: &ReportQuery, html: &str) -> Result<ReportResult, VinhaError> {
    let table = extract_table(html)?;
    report::assemble(query, &table)
}
