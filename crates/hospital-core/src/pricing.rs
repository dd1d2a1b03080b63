//! Service pricing lookup for bookings.

use serde::Serialize;

use crate::models::{HospitalService, ServiceCategory, SERVICE_CATALOG};

/// Look up a service by catalog code (case-insensitive).
pub fn find_service(id: &str) -> Option<&'static HospitalService> {
    let id = id.trim();
    SERVICE_CATALOG
        .iter()
        .find(|s| s.id.eq_ignore_ascii_case(id))
}

/// All services billed under a category, in catalog order.
pub fn services_in_category(category: ServiceCategory) -> Vec<&'static HospitalService> {
    SERVICE_CATALOG
        .iter()
        .filter(|s| s.category == category)
        .collect()
}

/// Sum of the applicable rate for each selected service. Unknown IDs contribute 0.
pub fn booking_total<S: AsRef<str>>(service_ids: &[S], corporate: bool) -> f64 {
    service_ids
        .iter()
        .filter_map(|id| find_service(id.as_ref()))
        .map(|s| s.rate(corporate))
        .sum()
}

/// Priced line on a booking summary.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BookingLine {
    pub service_id: String,
    pub name: String,
    pub rate: f64,
}

/// Booking summary shown before confirming a service booking.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BookingSummary {
    pub corporate: bool,
    pub lines: Vec<BookingLine>,
    /// IDs that were selected but are not in the catalog
    pub unknown_ids: Vec<String>,
    pub total: f64,
}

impl BookingSummary {
    /// Price a selection of services.
    pub fn build<S: AsRef<str>>(service_ids: &[S], corporate: bool) -> Self {
        let mut lines = Vec::new();
        let mut unknown_ids = Vec::new();

        for id in service_ids {
            match find_service(id.as_ref()) {
                Some(service) => lines.push(BookingLine {
                    service_id: service.id.to_string(),
                    name: service.name.to_string(),
                    rate: service.rate(corporate),
                }),
                None => unknown_ids.push(id.as_ref().to_string()),
            }
        }

        let total = lines.iter().map(|l| l.rate).sum();
        Self {
            corporate,
            lines,
            unknown_ids,
            total,
        }
    }
}
