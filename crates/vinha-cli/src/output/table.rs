use rust_decimal::Decimal;
use vinha_core::model::ReportQuery;
use vinha_core::report::{GroupedReport, ReportResult, TradeReport};

pub fn print(query: &ReportQuery, result: &ReportResult) {
    print!("{}", format_report(query, result));
}

pub fn format_report(query: &ReportQuery, result: &ReportResult) -> String {
    let mut out = match query.category() {
        Some(category) => format!("=== {} {} ({}) ===\n\n", query.kind, query.year, category),
        None => format!("=== {} {} ===\n\n", query.kind, query.year),
    };
    match result {
        ReportResult::Grouped(report) => format_grouped(report, &mut out),
        ReportResult::Trade(report) => format_trade(report, &mut out),
    }
    out
}

fn format_grouped(report: &GroupedReport, out: &mut String) {
    let width = report
        .groups
        .iter()
        .flat_map(|g| {
            std::iter::once(g.label.chars().count())
                .chain(g.children.iter().map(|c| c.label.chars().count() + 2))
        })
        .max()
        .unwrap_or(10)
        .max(5);

    for group in &report.groups {
        out.push_str(&format!("  {:<width$}  {:>15}\n", group.label, group.value));
        for child in &group.children {
            let label = format!("  {}", child.label);
            out.push_str(&format!("  {:<width$}  {:>15}\n", label, child.value));
        }
    }

    if let Some(total) = &report.total {
        out.push_str(&format!("\n  {:<width$}  {:>15}\n", "Total", total));
    }
}

fn format_trade(report: &TradeReport, out: &mut String) {
    let width = report
        .data
        .iter()
        .map(|r| r.country.chars().count())
        .max()
        .unwrap_or(7)
        .max(7);

    out.push_str(&format!(
        "  {:<width$}  {:>15}  {:>15}\n",
        "Country", "Quantity (kg)", "Value (US$)"
    ));
    for record in &report.data {
        out.push_str(&format!(
            "  {:<width$}  {:>15}  {:>15}\n",
            record.country,
            amount(record.quantity_kg),
            amount(record.value_usd)
        ));
    }

    if let Some(total) = &report.total {
        out.push_str(&format!(
            "\n  {:<width$}  {:>15}  {:>15}\n",
            "Total",
            amount(total.total_quantity_kg),
            amount(total.total_value_usd)
        ));
    }
}

fn amount(value: Option<Decimal>) -> String {
    value.map(|d| d.to_string()).unwrap_or_else(|| "-".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vinha_core::model::{ChildEntry, Group, ReportKind, TradeRecord};
    use vinha_core::parsing::PRODUCTION_SHAPE;

    #[test]
    fn test_grouped_lists_children_indented() {
        let query = ReportQuery::new(2023, ReportKind::Production, None).unwrap();
        let result = ReportResult::Grouped(GroupedReport {
            year: 2023,
            category: None,
            total: Some("200".into()),
            shape: PRODUCTION_SHAPE,
            groups: vec![Group {
                label: "VINHO DE MESA".into(),
                value: "169".into(),
                children: vec![ChildEntry {
                    label: "Tinto".into(),
                    value: "139".into(),
                }],
            }],
        });
        let text = format_report(&query, &result);
        assert!(text.starts_with("=== production 2023 ===\n"));
        assert!(text.contains("    Tinto"));
        assert!(text.contains("Total"));
    }

    #[test]
    fn test_trade_missing_amount_shown_as_dash() {
        let query = ReportQuery::new(2023, ReportKind::Export, Some("juice")).unwrap();
        let result = ReportResult::Trade(TradeReport {
            data: vec![TradeRecord {
                country: "Japão".into(),
                quantity_kg: None,
                value_usd: None,
            }],
            total: None,
        });
        let text = format_report(&query, &result);
        assert!(text.contains("(juice)"));
        let row = text.lines().find(|l| l.contains("Japão")).unwrap();
        assert!(row.trim_end().ends_with('-'));
    }
}
