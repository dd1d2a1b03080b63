//! Spreadsheet export of the discharge board.

use chrono::NaiveDate;

use crate::models::{parse_timestamp, DischargedPatientView};

/// Fixed column set of the discharged-patients sheet.
pub const DISCHARGED_COLUMNS: &[&str] = &[
    "Patient ID",
    "First Name",
    "Last Name",
    "Phone",
    "Gender",
    "Discharge Date",
    "Admission Duration",
    "Final Diagnosis",
    "Total Bill Amount",
    "Total Spent",
    "Visit Count",
];

/// File name for an export taken on `date`.
pub fn export_filename(date: NaiveDate) -> String {
    format!("discharged_patients_{}.csv", date.format("%Y-%m-%d"))
}

/// Export rows (already filtered and sorted) as CSV.
pub fn export_discharged_csv<'a, I>(rows: I, currency_symbol: &str) -> String
where
    I: IntoIterator<Item = &'a DischargedPatientView>,
{
    let mut csv = String::new();

    // Header
    csv.push_str(
        &DISCHARGED_COLUMNS
            .iter()
            .map(|c| escape_csv(c))
            .collect::<Vec<_>>()
            .join(","),
    );
    csv.push('\n');

    for row in rows {
        let patient = &row.patient;
        let fields = [
            escape_csv(&patient.patient_id),
            escape_csv(&patient.first_name),
            escape_csv(&patient.last_name),
            escape_csv(&patient.phone),
            escape_csv(patient.gender.as_deref().unwrap_or("")),
            escape_csv(&format_export_date(row.discharge_date.as_deref())),
            escape_csv(row.admission_duration.as_deref().unwrap_or("")),
            escape_csv(&row.final_diagnosis),
            escape_csv(&format_currency(row.total_bill_amount, currency_symbol)),
            escape_csv(&format_currency(
                patient.total_spent.unwrap_or(0.0),
                currency_symbol,
            )),
            patient.visit_count.unwrap_or(0).to_string(),
        ];
        csv.push_str(&fields.join(","));
        csv.push('\n');
    }

    csv
}

/// `<symbol><grouped integer>.<2 decimals>`, e.g. `₹12,345.50`.
pub fn format_currency(amount: f64, symbol: &str) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}{}{}.{:02}", sign, symbol, grouped, fraction)
}

/// Calendar date of a stored timestamp; raw text when unparsable, blank when missing.
fn format_export_date(value: Option<&str>) -> String {
    match value {
        Some(raw) => parse_timestamp(raw)
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| raw.to_string()),
        None => String::new(),
    }
}

/// Escape a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
