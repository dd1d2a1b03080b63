//! Print-ready HTML documents.
//!
//! Each renderer returns a self-contained page with embedded styles that
//! opens the browser print dialog on load.

use serde::{Deserialize, Serialize};

use crate::intake_output::{IntakeOutputChart, INTAKE_FIELDS, OUTPUT_FIELDS};
use crate::FormResult;

const PRINT_STYLE: &str = r#"
body { font-family: Arial, sans-serif; font-size: 12px; margin: 16px; }
h1 { font-size: 18px; text-align: center; margin-bottom: 4px; }
.meta { display: flex; flex-wrap: wrap; gap: 16px; margin-bottom: 12px; }
table { border-collapse: collapse; width: 100%; }
th, td { border: 1px solid #333; padding: 4px; text-align: center; }
tr.totals td { font-weight: bold; }
.section { margin-top: 10px; }
.section h2 { font-size: 13px; margin: 0 0 2px 0; }
@media print { body { margin: 0; } }
"#;

/// Column headers for the fluid fields, in chart order.
fn field_label(field: &str) -> &str {
    match field {
        "oralAmount" => "Oral",
        "rtFeed" => "RT Feed",
        "iv01" => "IV 1",
        "iv02" => "IV 2",
        "iv03" => "IV 3",
        "iv04" => "IV 4",
        "bloodProducts" => "Blood Products",
        "urine" => "Urine",
        "vomitus" => "Vomitus",
        "rtAspirate" => "RT Aspirate",
        "drain1" => "Drain 1",
        "drain2" => "Drain 2",
        "drain3" => "Drain 3",
        "stool" => "Stool",
        other => other,
    }
}

/// Escape text for interpolation into HTML element content or attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Whole numbers print without a fraction; everything else with two places.
fn format_ml(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
         <style>{style}</style>\n</head>\n<body onload=\"window.print()\">\n{body}</body>\n</html>\n",
        title = escape_html(title),
        style = PRINT_STYLE,
        body = body,
    )
}

fn meta_item(label: &str, value: &str) -> String {
    format!(
        "<div><strong>{}:</strong> {}</div>\n",
        escape_html(label),
        escape_html(value)
    )
}

/// Render the intake/output chart with a per-row and chart totals line.
pub fn render_intake_output_html(chart: &IntakeOutputChart) -> FormResult<String> {
    chart.validate()?;

    let mut body = String::new();
    body.push_str("<h1>Intake / Output Chart</h1>\n<div class=\"meta\">\n");
    body.push_str(&meta_item("Patient", &chart.patient_name));
    body.push_str(&meta_item("IPD No", &chart.ipd_number));
    if let Some(bed) = chart.bed_number.as_deref().filter(|b| !b.trim().is_empty()) {
        body.push_str(&meta_item("Bed", bed));
    }
    body.push_str(&meta_item("Date", &chart.chart_date));
    body.push_str("</div>\n<table>\n<thead>\n<tr><th rowspan=\"2\">Time</th>");
    body.push_str(&format!(
        "<th colspan=\"{}\">Intake (mL)</th><th colspan=\"{}\">Output (mL)</th></tr>\n<tr>",
        INTAKE_FIELDS.len() + 1,
        OUTPUT_FIELDS.len() + 1
    ));
    for field in INTAKE_FIELDS {
        body.push_str(&format!("<th>{}</th>", field_label(field)));
    }
    body.push_str("<th>Total</th>");
    for field in OUTPUT_FIELDS {
        body.push_str(&format!("<th>{}</th>", field_label(field)));
    }
    body.push_str("<th>Total</th></tr>\n</thead>\n<tbody>\n");

    for entry in &chart.entries {
        body.push_str(&format!("<tr><td>{}</td>", escape_html(&entry.time)));
        for field in INTAKE_FIELDS {
            body.push_str(&format!("<td>{}</td>", cell(entry.fields.get(*field))));
        }
        body.push_str(&format!("<td>{}</td>", format_ml(entry.intake())));
        for field in OUTPUT_FIELDS {
            body.push_str(&format!("<td>{}</td>", cell(entry.fields.get(*field))));
        }
        body.push_str(&format!("<td>{}</td></tr>\n", format_ml(entry.output())));
    }

    let totals = chart.totals();
    body.push_str(&format!(
        "<tr class=\"totals\"><td>Total</td><td colspan=\"{}\">{}</td><td colspan=\"{}\">{}</td></tr>\n",
        INTAKE_FIELDS.len() + 1,
        format_ml(totals.total_intake),
        OUTPUT_FIELDS.len() + 1,
        format_ml(totals.total_output),
    ));
    body.push_str("</tbody>\n</table>\n");
    body.push_str(&format!(
        "<p class=\"section\"><strong>Balance:</strong> {} mL</p>\n",
        format_ml(totals.balance)
    ));

    tracing::debug!(
        ipd = %chart.ipd_number,
        rows = chart.entries.len(),
        "rendered intake/output chart"
    );
    Ok(page(
        &format!("Intake Output Chart - {}", chart.patient_name),
        &body,
    ))
}

fn cell(value: Option<&serde_json::Value>) -> String {
    match value {
        Some(serde_json::Value::String(s)) => escape_html(s),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Everything printed on a discharge summary sheet.
///
/// Amounts arrive preformatted so the sheet matches the caller's currency.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DischargeSheet {
    pub patient_name: String,
    pub patient_id: String,
    pub ipd_number: Option<String>,
    pub admission_date: Option<String>,
    pub discharge_date: Option<String>,
    pub admission_duration: Option<String>,
    pub consultant: Option<String>,
    pub final_diagnosis: String,
    pub chief_complaint: Option<String>,
    pub hospital_course: Option<String>,
    pub condition_at_discharge: Option<String>,
    pub discharge_advice: Option<String>,
    pub follow_up: Option<String>,
    pub bill_total: Option<String>,
}

impl DischargeSheet {
    pub fn validate(&self) -> FormResult<()> {
        crate::require_non_blank("patientName", &self.patient_name)?;
        crate::require_non_blank("patientId", &self.patient_id)?;
        Ok(())
    }
}

/// Narrative sections skip when empty; multi-line text keeps its breaks.
fn section(title: &str, text: Option<&str>) -> String {
    match text.map(str::trim).filter(|t| !t.is_empty()) {
        Some(t) => format!(
            "<div class=\"section\"><h2>{}</h2><div>{}</div></div>\n",
            escape_html(title),
            escape_html(t).replace('\n', "<br>")
        ),
        None => String::new(),
    }
}

/// Render the discharge summary sheet.
pub fn render_discharge_summary_html(sheet: &DischargeSheet) -> FormResult<String> {
    sheet.validate()?;

    let mut body = String::new();
    body.push_str("<h1>Discharge Summary</h1>\n<div class=\"meta\">\n");
    body.push_str(&meta_item("Patient", &sheet.patient_name));
    body.push_str(&meta_item("Patient ID", &sheet.patient_id));
    let optional = [
        ("IPD No", &sheet.ipd_number),
        ("Admitted", &sheet.admission_date),
        ("Discharged", &sheet.discharge_date),
        ("Stay", &sheet.admission_duration),
        ("Consultant", &sheet.consultant),
    ];
    for (label, value) in optional {
        if let Some(v) = value.as_deref().filter(|v| !v.trim().is_empty()) {
            body.push_str(&meta_item(label, v));
        }
    }
    body.push_str("</div>\n");

    body.push_str(&section("Final Diagnosis", Some(sheet.final_diagnosis.as_str())));
    body.push_str(&section("Chief Complaint", sheet.chief_complaint.as_deref()));
    body.push_str(&section("Hospital Course", sheet.hospital_course.as_deref()));
    body.push_str(&section(
        "Condition at Discharge",
        sheet.condition_at_discharge.as_deref(),
    ));
    body.push_str(&section("Discharge Advice", sheet.discharge_advice.as_deref()));
    body.push_str(&section("Follow Up", sheet.follow_up.as_deref()));
    body.push_str(&section("Total Bill", sheet.bill_total.as_deref()));

    Ok(page(
        &format!("Discharge Summary - {}", sheet.patient_name),
        &body,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake_output::IntakeOutputEntry;
    use crate::FormError;

    fn chart() -> IntakeOutputChart {
        IntakeOutputChart {
            patient_name: "Asha Rao".into(),
            ipd_number: "IPD-12".into(),
            bed_number: Some("B-4".into()),
            chart_date: "2024-01-06".into(),
            entries: vec![
                IntakeOutputEntry::new("08:00")
                    .with("oralAmount", "100")
                    .with("iv01", "50")
                    .with("urine", "80"),
                IntakeOutputEntry::new("12:00")
                    .with("oralAmount", "")
                    .with("iv02", "200")
                    .with("drain1", "30"),
            ],
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_chart_contains_totals_and_print_hook() {
        let html = render_intake_output_html(&chart()).unwrap();
        assert!(html.contains("window.print()"));
        assert!(html.contains("<td colspan=\"8\">350</td>"));
        assert!(html.contains("<td colspan=\"8\">110</td>"));
        assert!(html.contains("<strong>Balance:</strong> 240 mL"));
        assert!(html.contains("<strong>Bed:</strong> B-4"));
    }

    #[test]
    fn test_chart_escapes_patient_context() {
        let mut c = chart();
        c.patient_name = "<script>alert(1)</script>".into();
        let html = render_intake_output_html(&c).unwrap();
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_chart_requires_context() {
        let mut c = chart();
        c.chart_date.clear();
        assert!(matches!(
            render_intake_output_html(&c),
            Err(FormError::MissingField("chartDate"))
        ));
    }

    #[test]
    fn test_discharge_sheet_sections() {
        let sheet = DischargeSheet {
            patient_name: "Asha Rao".into(),
            patient_id: "PID1".into(),
            discharge_date: Some("2024-01-06".into()),
            admission_duration: Some("5 days".into()),
            final_diagnosis: "Not specified".into(),
            discharge_advice: Some("Rest\nFluids".into()),
            bill_total: Some("₹18,450.50".into()),
            ..DischargeSheet::default()
        };
        let html = render_discharge_summary_html(&sheet).unwrap();
        assert!(html.contains("<strong>Stay:</strong> 5 days"));
        assert!(html.contains("Rest<br>Fluids"));
        assert!(html.contains("₹18,450.50"));
        assert!(!html.contains("Hospital Course"));
        assert!(!html.contains("Consultant"));
    }

    #[test]
    fn test_discharge_sheet_requires_patient() {
        let sheet = DischargeSheet {
            patient_name: "Asha Rao".into(),
            ..DischargeSheet::default()
        };
        assert!(matches!(
            render_discharge_summary_html(&sheet),
            Err(FormError::MissingField("patientId"))
        ));
    }
}
