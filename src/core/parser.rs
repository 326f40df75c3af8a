use crate::core::normalize::title_case;
use crate::core::schema::HEADER_SYNONYMS;
use crate::domain::model::{RawRecord, Warning};
use crate::utils::error::{IngestError, Result};

/// Splits raw text into trimmed, non-blank lines. A leading byte-order mark
/// (Excel "CSV UTF-8") is dropped first.
pub fn split_lines(csv_text: &str) -> Vec<String> {
    csv_text
        .strip_prefix('\u{FEFF}')
        .unwrap_or(csv_text)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Maps one header cell to its canonical name: synonym table first, then title-case.
pub fn canonical_header(cell: &str) -> String {
    let cleaned = cell.trim().replace('"', "");
    let cleaned = cleaned.trim();
    let lowered = cleaned.to_lowercase();

    HEADER_SYNONYMS
        .iter()
        .find(|(alias, _)| *alias == lowered)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_else(|| title_case(cleaned))
}

/// Single-pass tokenizer: `"` toggles quoting, commas inside quotes do not split,
/// and the trailing field is always emitted.
pub fn tokenize_line(line: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => values.push(finish_field(&mut current)),
            _ => current.push(ch),
        }
    }
    values.push(finish_field(&mut current));
    values
}

fn finish_field(current: &mut String) -> String {
    let field = std::mem::take(current);
    let trimmed = field.trim();
    let trimmed = trimmed.strip_prefix('"').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('"').unwrap_or(trimmed);
    trimmed.to_string()
}

#[derive(Debug, Clone, Default)]
pub struct ParsedRows {
    pub headers: Vec<String>,
    pub records: Vec<RawRecord>,
    pub warnings: Vec<Warning>,
}

/// Tokenizes the header line and every following line into raw records.
/// Rows of the wrong width are padded or truncated and reported, never rejected.
pub fn parse_records(lines: &[String], header_index: usize) -> Result<ParsedRows> {
    if lines.len() < 2 {
        return Err(IngestError::TooFewLines { found: lines.len() });
    }

    let header_line = lines
        .get(header_index)
        .ok_or(IngestError::TooFewLines { found: lines.len() })?;
    let headers: Vec<String> = header_line.split(',').map(canonical_header).collect();
    tracing::debug!("Canonical headers: {:?}", headers);

    let mut records: Vec<RawRecord> = Vec::new();
    let mut warnings = Vec::new();

    for (index, line) in lines.iter().enumerate().skip(header_index + 1) {
        let mut values = tokenize_line(line);

        if values.len() != headers.len() {
            let row_number = index + 1;
            warnings.push(Warning::line(
                row_number,
                format!(
                    "has {} values but {} headers expected",
                    values.len(),
                    headers.len()
                ),
            ));
            values.resize(headers.len(), String::new());
        }

        records.push(headers.iter().cloned().zip(values).collect());
    }

    Ok(ParsedRows {
        headers,
        records,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines_drops_blanks_and_carriage_returns() {
        let lines = split_lines("a,b\r\n\r\n  c,d  \n\n");
        assert_eq!(lines, vec!["a,b", "c,d"]);
    }

    #[test]
    fn test_split_lines_strips_byte_order_mark() {
        let lines = split_lines("\u{FEFF}Product Code,Product Group\r\nP1,Fasteners\r\n");
        assert_eq!(lines, vec!["Product Code,Product Group", "P1,Fasteners"]);
        assert_eq!(canonical_header(&tokenize_line(&lines[0])[0]), "Product Code");
    }

    #[test]
    fn test_canonical_header() {
        assert_eq!(canonical_header("assembly no"), "Assembly Number");
        assert_eq!(canonical_header(" \"QTY\" "), "Assembled Quantity");
        assert_eq!(canonical_header("prod desc"), "Product Description");
        assert_eq!(canonical_header("bin LOCATION"), "Bin Location");
        assert_eq!(canonical_header(""), "");
    }

    #[test]
    fn test_tokenize_respects_quotes() {
        assert_eq!(
            tokenize_line(r#"P1,"Widget, large",5"#),
            vec!["P1", "Widget, large", "5"]
        );
        assert_eq!(tokenize_line("a,,"), vec!["a", "", ""]);
        assert_eq!(tokenize_line(" a , b "), vec!["a", "b"]);
    }

    #[test]
    fn test_parse_records_pads_short_rows() {
        let lines = split_lines("Product Code,Product Group,Base Unit\nP1,Tools\nP2,Parts,BOX");
        let parsed = parse_records(&lines, 0).unwrap();

        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.records[0].get("Base Unit"), Some(""));
        assert_eq!(parsed.records[1].get("Base Unit"), Some("BOX"));
        assert_eq!(parsed.warnings.len(), 1);
        assert_eq!(
            parsed.warnings[0].to_string(),
            "Row 2 has 2 values but 3 headers expected"
        );
    }

    #[test]
    fn test_parse_records_truncates_long_rows() {
        let lines = split_lines("Title\nProduct Code,Product Group\nP1,Tools,extra,more");
        let parsed = parse_records(&lines, 1).unwrap();

        assert_eq!(parsed.records[0].values.len(), 2);
        assert_eq!(
            parsed.warnings[0].to_string(),
            "Row 3 has 4 values but 2 headers expected"
        );
    }

    #[test]
    fn test_parse_records_requires_two_lines() {
        let lines = split_lines("Product Code\n\n");
        assert!(matches!(
            parse_records(&lines, 0),
            Err(IngestError::TooFewLines { found: 1 })
        ));
    }

    #[test]
    fn test_values_stay_strings() {
        let lines = split_lines("Qty,Assembly Date\n0012,45678");
        let parsed = parse_records(&lines, 0).unwrap();
        assert_eq!(parsed.records[0].get("Assembled Quantity"), Some("0012"));
        assert_eq!(parsed.records[0].get("Assembly Date"), Some("45678"));
    }
}
