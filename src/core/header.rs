use crate::core::parser::canonical_header;
use crate::core::schema::header_keywords;
use crate::domain::model::TargetEntity;

pub const DEFAULT_SCAN_LINES: usize = 10;
pub const DEFAULT_MIN_KEYWORD_MATCHES: usize = 2;

/// Finds the column-header row inside a noisy export.
#[derive(Debug, Clone, Copy)]
pub struct HeaderLocator {
    scan_lines: usize,
    min_matches: usize,
}

impl Default for HeaderLocator {
    fn default() -> Self {
        Self {
            scan_lines: DEFAULT_SCAN_LINES,
            min_matches: DEFAULT_MIN_KEYWORD_MATCHES,
        }
    }
}

impl HeaderLocator {
    pub fn new(scan_lines: usize, min_matches: usize) -> Self {
        Self {
            scan_lines,
            min_matches,
        }
    }

    /// Index of the first scanned line with enough keyword hits, otherwise the
    /// second line (or the only one). Never fails.
    pub fn locate(&self, lines: &[String], entity: TargetEntity) -> usize {
        let keywords = header_keywords(entity);

        for (index, line) in lines.iter().take(self.scan_lines).enumerate() {
            let matches = keyword_matches(line, keywords);
            tracing::debug!("Header candidate line {}: {} keyword matches", index, matches);
            if matches >= self.min_matches {
                return index;
            }
        }

        let fallback = lines.len().saturating_sub(1).min(1);
        tracing::warn!(
            "No header row matched {} keywords for {}, assuming line {}",
            self.min_matches,
            entity,
            fallback
        );
        fallback
    }
}

/// Counts keywords found either in the raw line or in its canonicalized
/// form, so `Asm No` style synonyms still count as `assembly number`.
fn keyword_matches(line: &str, keywords: &[&str]) -> usize {
    let raw = line.to_lowercase();
    let canonical = line
        .split(',')
        .map(canonical_header)
        .collect::<Vec<_>>()
        .join(",")
        .to_lowercase();

    keywords
        .iter()
        .filter(|keyword| raw.contains(*keyword) || canonical.contains(*keyword))
        .count()
}

pub fn locate_header(lines: &[String], entity: TargetEntity) -> usize {
    HeaderLocator::default().locate(lines, entity)
}
