use vinha_core::error::VinhaError;
use vinha_core::report::ReportResult;

pub fn print(result: &ReportResult) -> Result<(), VinhaError> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}
