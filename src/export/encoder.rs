use crate::config::CellQuoting;
use crate::models::Record;
use anyhow::{Context, Result};
use csv::{QuoteStyle, Terminator, WriterBuilder};

const ROW_SEPARATOR: &str = "\r\n";

/// Serialise records to CSV text.
///
/// The header is the first record's keys in insertion order; later records
/// are read through that header, with missing keys written as empty cells.
/// Rows are CRLF-separated with no trailing terminator. No input, no output.
pub fn encode_csv(records: &[Record], quoting: CellQuoting) -> Result<String> {
    let Some(first) = records.first() else {
        return Ok(String::new());
    };
    let header: Vec<&str> = first.keys().collect();

    let body = match quoting {
        CellQuoting::Rfc4180 => encode_rfc4180(&header, records)?,
        CellQuoting::Json => encode_json(&header, records)?,
    };

    Ok(format!("{}{}{}", header.join(","), ROW_SEPARATOR, body))
}

fn encode_rfc4180(header: &[&str], records: &[Record]) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());

    for record in records {
        writer.write_record(header.iter().map(|key| record.get(key).unwrap_or("")))?;
    }

    let bytes = writer.into_inner().context("Failed to flush CSV writer")?;
    let mut text = String::from_utf8(bytes).context("CSV output is not UTF-8")?;
    text.truncate(text.trim_end_matches(ROW_SEPARATOR).len());
    Ok(text)
}

/// Cells as JSON string literals: quoted, with backslash escapes.
fn encode_json(header: &[&str], records: &[Record]) -> Result<String> {
    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        let cells = header
            .iter()
            .map(|key| serde_json::to_string(record.get(key).unwrap_or("")))
            .collect::<serde_json::Result<Vec<_>>>()?;
        rows.push(cells.join(","));
    }
    Ok(rows.join(ROW_SEPARATOR))
}
