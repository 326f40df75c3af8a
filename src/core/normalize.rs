//! Total, stateless coercions from raw cell text to canonical values.
//!
//! None of these functions fail. Anything worth telling the operator comes back
//! alongside the value in a [`Normalized`].

use regex::Regex;
use std::str::FromStr;
use std::sync::LazyLock;

/// A value plus the warnings produced while computing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized<T> {
    pub value: T,
    pub warnings: Vec<String>,
}

impl<T> Normalized<T> {
    pub fn clean(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    pub fn with_warning(value: T, warning: impl Into<String>) -> Self {
        Self {
            value,
            warnings: vec![warning.into()],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumType {
    Status,
    AssemblyType,
    Auto,
}

impl EnumType {
    fn synonyms(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            EnumType::Status => STATUS_SYNONYMS,
            EnumType::AssemblyType => ASSEMBLY_TYPE_SYNONYMS,
            EnumType::Auto => AUTO_SYNONYMS,
        }
    }
}

impl FromStr for EnumType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "status" => Ok(EnumType::Status),
            "assemblyType" => Ok(EnumType::AssemblyType),
            "auto" => Ok(EnumType::Auto),
            other => Err(format!("unknown enum type: {}", other)),
        }
    }
}

const STATUS_SYNONYMS: &[(&str, &str)] = &[
    ("active", "Active"),
    ("pending", "Pending"),
    ("inactive", "Inactive"),
    ("completed", "Completed"),
    ("in progress", "In Progress"),
    ("factory disassembly", "Factory Disassembly"),
];

const ASSEMBLY_TYPE_SYNONYMS: &[(&str, &str)] = &[
    ("main assembly", "Main Assembly"),
    ("sub assembly", "Sub Assembly"),
    ("main", "Main Assembly"),
    ("sub", "Sub Assembly"),
];

const AUTO_SYNONYMS: &[(&str, &str)] = &[
    ("yes", "Yes"),
    ("no", "No"),
    ("y", "Yes"),
    ("n", "No"),
    ("true", "Yes"),
    ("false", "No"),
    ("1", "Yes"),
    ("0", "No"),
];

static NUMERIC_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+(\.[0-9]+)?$").expect("numeric pattern"));

static NUMBER_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?([0-9]+(\.[0-9]*)?|\.[0-9]+)").expect("number prefix pattern")
});

// 依序嘗試：日/月/年、年/月/日、日/月/兩位數年
static DAY_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{1,2})[/\-]([0-9]{1,2})[/\-]([0-9]{4})$").expect("day-first pattern")
});
static YEAR_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{4})[/\-]([0-9]{1,2})[/\-]([0-9]{1,2})$").expect("year-first pattern")
});
static SHORT_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{1,2})[/\-]([0-9]{1,2})[/\-]([0-9]{2})$").expect("short-year pattern")
});

/// Upper-cases the first letter of every space-separated word and lower-cases the rest.
pub fn title_case(value: &str) -> String {
    value
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

pub fn normalize_string(value: Option<&str>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

pub fn normalize_number(value: Option<&str>, default: i64) -> i64 {
    let normalized = normalize_string(value);
    if normalized.is_empty() {
        return default;
    }

    let cleaned: String = normalized
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    NUMBER_PREFIX
        .find(&cleaned)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|parsed| parsed.is_finite())
        .map(|parsed| (parsed + 0.5).floor() as i64)
        .unwrap_or(default)
}

pub fn normalize_date(value: Option<&str>) -> Normalized<String> {
    let normalized = normalize_string(value);
    if normalized.is_empty() {
        return Normalized::clean(String::new());
    }

    // 純數字多半是試算表的序號日期，不當作日期
    if NUMERIC_ONLY.is_match(&normalized) {
        return Normalized::with_warning(
            String::new(),
            format!(
                "Numeric value passed to date parser, skipping: \"{}\"",
                normalized
            ),
        );
    }

    if let Some(caps) = DAY_FIRST.captures(&normalized) {
        return Normalized::clean(iso_date(&caps[3], &caps[2], &caps[1]));
    }
    if let Some(caps) = YEAR_FIRST.captures(&normalized) {
        return Normalized::clean(iso_date(&caps[1], &caps[2], &caps[3]));
    }
    if let Some(caps) = SHORT_YEAR.captures(&normalized) {
        let year = format!("20{}", &caps[3]);
        return Normalized::clean(iso_date(&year, &caps[2], &caps[1]));
    }

    tracing::warn!("Date format not recognized, using as-is: \"{}\"", normalized);
    Normalized::clean(normalized)
}

fn iso_date(year: &str, month: &str, day: &str) -> String {
    format!("{}-{:0>2}-{:0>2}", year, month, day)
}

pub fn normalize_enum_value(value: Option<&str>, enum_type: EnumType) -> String {
    let normalized = normalize_string(value);
    if normalized.is_empty() {
        return String::new();
    }

    let lowered = normalized.to_lowercase();
    enum_type
        .synonyms()
        .iter()
        .find(|(alias, _)| *alias == lowered)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_else(|| title_case(&normalized))
}
