//! Billable hospital service catalog.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Department a service is billed under.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ServiceCategory {
    Laboratory,
    Radiology,
    Consultation,
    Procedure,
    RoomCharges,
    Nursing,
}

impl ServiceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceCategory::Laboratory => "laboratory",
            ServiceCategory::Radiology => "radiology",
            ServiceCategory::Consultation => "consultation",
            ServiceCategory::Procedure => "procedure",
            ServiceCategory::RoomCharges => "room_charges",
            ServiceCategory::Nursing => "nursing",
        }
    }
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "laboratory" | "lab" => Ok(ServiceCategory::Laboratory),
            "radiology" => Ok(ServiceCategory::Radiology),
            "consultation" => Ok(ServiceCategory::Consultation),
            "procedure" => Ok(ServiceCategory::Procedure),
            "room_charges" | "room" => Ok(ServiceCategory::RoomCharges),
            "nursing" => Ok(ServiceCategory::Nursing),
            other => Err(format!("unknown service category: {}", other)),
        }
    }
}

/// A single billable service with its two tariffs.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct HospitalService {
    /// Catalog code, e.g. "LAB001"
    pub id: &'static str,
    pub name: &'static str,
    pub category: ServiceCategory,
    /// Walk-in tariff
    pub general_rate: f64,
    /// Discounted tariff for corporate-sponsored patients
    pub corporate_rate: f64,
}

impl HospitalService {
    /// Rate applicable to the patient's sponsorship.
    pub fn rate(&self, corporate: bool) -> f64 {
        if corporate {
            self.corporate_rate
        } else {
            self.general_rate
        }
    }
}

const fn service(
    id: &'static str,
    name: &'static str,
    category: ServiceCategory,
    general_rate: f64,
    corporate_rate: f64,
) -> HospitalService {
    HospitalService {
        id,
        name,
        category,
        general_rate,
        corporate_rate,
    }
}

/// The static tariff table.
pub static SERVICE_CATALOG: &[HospitalService] = &[
    service("LAB001", "Complete Blood Count", ServiceCategory::Laboratory, 300.0, 250.0),
    service("LAB002", "Liver Function Test", ServiceCategory::Laboratory, 650.0, 550.0),
    service("LAB003", "Kidney Function Test", ServiceCategory::Laboratory, 600.0, 500.0),
    service("LAB004", "Lipid Profile", ServiceCategory::Laboratory, 700.0, 600.0),
    service("LAB005", "HbA1c", ServiceCategory::Laboratory, 450.0, 380.0),
    service("LAB006", "Urine Routine", ServiceCategory::Laboratory, 150.0, 120.0),
    service("LAB007", "Dengue NS1 Antigen", ServiceCategory::Laboratory, 900.0, 750.0),
    service("RAD001", "X-Ray Chest PA View", ServiceCategory::Radiology, 450.0, 380.0),
    service("RAD002", "Ultrasound Abdomen", ServiceCategory::Radiology, 1200.0, 1000.0),
    service("RAD003", "CT Scan Brain (Plain)", ServiceCategory::Radiology, 3500.0, 3000.0),
    service("RAD004", "MRI Lumbar Spine", ServiceCategory::Radiology, 7500.0, 6500.0),
    service("RAD005", "2D Echocardiography", ServiceCategory::Radiology, 2200.0, 1900.0),
    service("CON001", "General Physician Consultation", ServiceCategory::Consultation, 500.0, 400.0),
    service("CON002", "Specialist Consultation", ServiceCategory::Consultation, 800.0, 650.0),
    service("CON003", "Emergency Consultation", ServiceCategory::Consultation, 1000.0, 850.0),
    service("PRO001", "ECG", ServiceCategory::Procedure, 350.0, 300.0),
    service("PRO002", "Minor Dressing", ServiceCategory::Procedure, 250.0, 200.0),
    service("PRO003", "Suturing", ServiceCategory::Procedure, 800.0, 650.0),
    service("PRO004", "Nebulization", ServiceCategory::Procedure, 200.0, 150.0),
    service("ROOM001", "General Ward (per day)", ServiceCategory::RoomCharges, 1500.0, 1200.0),
    service("ROOM002", "Semi-Private Room (per day)", ServiceCategory::RoomCharges, 2500.0, 2000.0),
    service("ROOM003", "Private Room (per day)", ServiceCategory::RoomCharges, 4000.0, 3400.0),
    service("ROOM004", "ICU (per day)", ServiceCategory::RoomCharges, 8000.0, 7000.0),
    service("NUR001", "Nursing Charges (per day)", ServiceCategory::Nursing, 600.0, 500.0),
    service("NUR002", "Injection Administration", ServiceCategory::Nursing, 100.0, 80.0),
];
