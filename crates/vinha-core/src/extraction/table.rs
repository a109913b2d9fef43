use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::error::VinhaError;
use crate::model::{RawCell, RawRow, RawTable};

static DATA_TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table.tb_base.tb_dados").expect("valid table selector"));
static BODY_ROWS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tbody tr").expect("valid tbody selector"));
static FOOTER_ROW: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tfoot tr").expect("valid tfoot selector"));
static BODY_CELLS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("valid td selector"));
static FOOTER_CELLS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td, th").expect("valid footer cell selector"));

/// Locate the data table of a Vitibrasil page and split it into body rows
/// and the totals footer.
///
/// Every report page carries exactly one `table.tb_base.tb_dados`; header
/// rows live in `thead` and use `<th>`, so only `<td>` cells are read from
/// the body. A missing footer is not an error.
pub fn extract_table(html: &str) -> Result<RawTable, VinhaError> {
    let doc = Html::parse_document(html);
    let table = doc
        .select(&DATA_TABLE)
        .next()
        .ok_or(VinhaError::TableNotFound)?;

    let body = table
        .select(&BODY_ROWS)
        .map(|tr| read_row(tr, &BODY_CELLS))
        .collect();

    let footer = table
        .select(&FOOTER_ROW)
        .next()
        .map(|tr| read_row(tr, &FOOTER_CELLS));

    Ok(RawTable { body, footer })
}

fn read_row(tr: ElementRef, cells: &Selector) -> RawRow {
    RawRow {
        cells: tr
            .select(cells)
            .map(|td| RawCell {
                text: collect_text(td),
                style: td
                    .value()
                    .attr("class")
                    .and_then(|c| c.split_whitespace().next())
                    .map(str::to_string),
            })
            .collect(),
    }
}

fn collect_text(element: ElementRef) -> String {
    let joined: String = element.text().collect();
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}
