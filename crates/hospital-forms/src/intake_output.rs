//! Intake/output chart: row entries and fluid balance totals.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{FormError, FormResult};

/// Fields summed into total intake (mL).
pub const INTAKE_FIELDS: &[&str] = &[
    "oralAmount",
    "rtFeed",
    "iv01",
    "iv02",
    "iv03",
    "iv04",
    "bloodProducts",
];

/// Fields summed into total output (mL).
pub const OUTPUT_FIELDS: &[&str] = &[
    "urine",
    "vomitus",
    "rtAspirate",
    "drain1",
    "drain2",
    "drain3",
    "stool",
];

/// One timed row of the chart.
///
/// Field values arrive as whatever the form held: numeric strings, numbers,
/// blanks or nulls.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct IntakeOutputEntry {
    /// Time label, e.g. "08:00"
    #[serde(default)]
    pub time: String,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl IntakeOutputEntry {
    pub fn new(time: impl Into<String>) -> Self {
        Self {
            time: time.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field setter.
    pub fn with(mut self, field: &str, value: &str) -> Self {
        self.fields
            .insert(field.to_string(), Value::String(value.to_string()));
        self
    }

    /// Parsed amount of one field, 0 when missing or non-numeric.
    pub fn amount(&self, field: &str) -> f64 {
        self.fields.get(field).map(parse_amount).unwrap_or(0.0)
    }

    pub fn intake(&self) -> f64 {
        INTAKE_FIELDS.iter().map(|f| self.amount(f)).sum()
    }

    pub fn output(&self) -> f64 {
        OUTPUT_FIELDS.iter().map(|f| self.amount(f)).sum()
    }

    /// Field names that belong to neither group.
    pub fn unknown_fields(&self) -> Vec<&str> {
        self.fields
            .keys()
            .map(String::as_str)
            .filter(|k| !INTAKE_FIELDS.contains(k) && !OUTPUT_FIELDS.contains(k))
            .collect()
    }
}

/// Numeric value of a form field; anything that is not a finite number is 0.
pub fn parse_amount(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Chart-level fluid totals.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IntakeOutputTotals {
    pub total_intake: f64,
    pub total_output: f64,
    /// Intake minus output
    pub balance: f64,
}

/// Sum intake and output across all rows.
pub fn calculate_totals(entries: &[IntakeOutputEntry]) -> IntakeOutputTotals {
    let total_intake: f64 = entries.iter().map(IntakeOutputEntry::intake).sum();
    let total_output: f64 = entries.iter().map(IntakeOutputEntry::output).sum();
    IntakeOutputTotals {
        total_intake,
        total_output,
        balance: total_intake - total_output,
    }
}

/// Rows posted by the front-end: either a bare array or `{"entries": [...]}`.
pub fn parse_entries_json(json: &str) -> FormResult<Vec<IntakeOutputEntry>> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Payload {
        Bare(Vec<IntakeOutputEntry>),
        Wrapped { entries: Vec<IntakeOutputEntry> },
    }

    let value: Value = serde_json::from_str(json)?;
    let entries = match serde_json::from_value::<Payload>(value) {
        Ok(Payload::Bare(entries)) | Ok(Payload::Wrapped { entries }) => entries,
        Err(_) => {
            return Err(FormError::InvalidFormat(
                "expected an array of entries or an object with an \"entries\" array".into(),
            ))
        }
    };

    for entry in &entries {
        let unknown = entry.unknown_fields();
        if !unknown.is_empty() {
            tracing::debug!(time = %entry.time, fields = ?unknown, "ignoring non-fluid fields");
        }
    }

    Ok(entries)
}

/// A filled-in intake/output chart. Patient context is passed in, never looked up.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IntakeOutputChart {
    pub patient_name: String,
    pub ipd_number: String,
    pub bed_number: Option<String>,
    /// Chart date, e.g. "2024-01-06"
    pub chart_date: String,
    pub entries: Vec<IntakeOutputEntry>,
}

impl IntakeOutputChart {
    /// Required header fields must be non-blank.
    pub fn validate(&self) -> FormResult<()> {
        crate::require_non_blank("patientName", &self.patient_name)?;
        crate::require_non_blank("ipdNumber", &self.ipd_number)?;
        crate::require_non_blank("chartDate", &self.chart_date)?;
        Ok(())
    }

    pub fn totals(&self) -> IntakeOutputTotals {
        calculate_totals(&self.entries)
    }
}
