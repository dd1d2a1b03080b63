//! In-memory discharge board: search, date filter, sort.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, FixedOffset};
use serde::{Deserialize, Serialize};

use super::reconcile::ReconcileOutcome;
use crate::models::{parse_timestamp, timestamp_millis_or_zero, DischargedPatientView};

/// Discharge-date window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DateFilter {
    #[default]
    All,
    /// Same local calendar day as now
    Today,
    /// Rolling seven days ending now
    ThisWeek,
    /// Local calendar month to date
    ThisMonth,
}

impl DateFilter {
    /// Whether a discharge timestamp falls inside the window.
    ///
    /// Day and month boundaries follow the offset of `now`. Undated or
    /// unparsable rows only pass `All`.
    pub fn matches(&self, discharge_date: Option<&str>, now: DateTime<FixedOffset>) -> bool {
        if *self == DateFilter::All {
            return true;
        }
        let Some(discharged) = discharge_date.and_then(parse_timestamp) else {
            return false;
        };
        let discharged = discharged.with_timezone(now.offset());

        match self {
            DateFilter::All => true,
            DateFilter::Today => discharged.date_naive() == now.date_naive(),
            DateFilter::ThisWeek => discharged >= now - Duration::days(7) && discharged <= now,
            DateFilter::ThisMonth => {
                discharged.year() == now.year()
                    && discharged.month() == now.month()
                    && discharged <= now
            }
        }
    }
}

impl FromStr for DateFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(DateFilter::All),
            "today" => Ok(DateFilter::Today),
            "week" | "this_week" => Ok(DateFilter::ThisWeek),
            "month" | "this_month" => Ok(DateFilter::ThisMonth),
            other => Err(format!("unknown date filter: {}", other)),
        }
    }
}

/// Sortable board column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    Name,
    DischargeDate,
    AdmissionDuration,
    BillAmount,
}

impl FromStr for SortColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(SortColumn::Name),
            "discharge_date" | "date" => Ok(SortColumn::DischargeDate),
            "admission_duration" | "duration" => Ok(SortColumn::AdmissionDuration),
            "bill" | "bill_amount" | "total_bill_amount" => Ok(SortColumn::BillAmount),
            other => Err(format!("unknown sort column: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => f.write_str("asc"),
            SortDirection::Descending => f.write_str("desc"),
        }
    }
}

/// Active sort column and direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SortState {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            column: SortColumn::DischargeDate,
            direction: SortDirection::Descending,
        }
    }
}

impl SortState {
    /// Column-header click: same column flips, a new column starts descending.
    pub fn click(&mut self, column: SortColumn) {
        if self.column == column {
            self.direction = self.direction.flipped();
        } else {
            self.column = column;
            self.direction = SortDirection::Descending;
        }
    }

    pub fn compare(&self, a: &DischargedPatientView, b: &DischargedPatientView) -> Ordering {
        let ordering = match self.column {
            SortColumn::Name => compare_names(&a.patient.full_name(), &b.patient.full_name()),
            SortColumn::DischargeDate => {
                timestamp_millis_or_zero(a.discharge_date.as_deref())
                    .cmp(&timestamp_millis_or_zero(b.discharge_date.as_deref()))
            }
            SortColumn::AdmissionDuration => a.duration_days().cmp(&b.duration_days()),
            SortColumn::BillAmount => a
                .total_bill_amount
                .partial_cmp(&b.total_bill_amount)
                .unwrap_or(Ordering::Equal),
        };

        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Base letter for common accented Latin letters, lowercase input.
fn fold_diacritic(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'č' => 'c',
        'ď' | 'đ' => 'd',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => 'e',
        'ğ' => 'g',
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' | 'ı' => 'i',
        'ł' | 'ľ' => 'l',
        'ñ' | 'ń' | 'ň' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => 'o',
        'ř' => 'r',
        'ś' | 'š' | 'ş' => 's',
        'ť' | 'ţ' => 't',
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' => 'u',
        'ý' | 'ÿ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        other => other,
    }
}

fn collation_key(name: &str) -> String {
    name.to_lowercase().chars().map(fold_diacritic).collect()
}

/// Name order ignoring case and accents, then accented after plain, then case.
fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

/// Case-insensitive substring search over name, phone, patient ID and diagnosis.
pub fn matches_search(view: &DischargedPatientView, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }

    [
        view.patient.first_name.as_str(),
        view.patient.last_name.as_str(),
        view.patient.phone.as_str(),
        view.patient.patient_id.as_str(),
        view.final_diagnosis.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&query))
}

/// Reconciled discharge list plus its view state.
#[derive(Debug, Clone, Default)]
pub struct DischargeBoard {
    records: Vec<DischargedPatientView>,
    pub search: String,
    pub date_filter: DateFilter,
    pub sort: SortState,
}

impl DischargeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a fresh reconciliation, keeping search/filter/sort.
    pub fn replace(&mut self, outcome: ReconcileOutcome) {
        self.records = outcome.patients;
    }

    pub fn records(&self) -> &[DischargedPatientView] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find(&self, patient_id: &str) -> Option<&DischargedPatientView> {
        self.records.iter().find(|v| v.patient.id == patient_id)
    }

    /// Drop one row by patient primary key without re-reconciling.
    pub fn remove_local(&mut self, patient_id: &str) -> Option<DischargedPatientView> {
        let index = self.records.iter().position(|v| v.patient.id == patient_id)?;
        Some(self.records.remove(index))
    }

    pub fn click_sort(&mut self, column: SortColumn) {
        self.sort.click(column);
    }

    /// Rows passing search and date filter, in sort order.
    pub fn visible(&self, now: DateTime<FixedOffset>) -> Vec<&DischargedPatientView> {
        let mut rows: Vec<&DischargedPatientView> = self
            .records
            .iter()
            .filter(|v| matches_search(v, &self.search))
            .filter(|v| self.date_filter.matches(v.discharge_date.as_deref(), now))
            .collect();
        rows.sort_by(|a, b| self.sort.compare(a, b));
        rows
    }
}
