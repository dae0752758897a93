//! Canonical resource prefixes.
//!
//! One entry per hospital resource domain. The binary mounts each of these;
//! applications supply the actual route groups.

/// Path prefixes under `/api`, one per resource route group.
pub const RESOURCE_PREFIXES: &[&str] = &[
    "/patients",
    "/doctors",
    "/nurses",
    "/staff",
    "/appointments",
    "/admissions",
    "/discharges",
    "/wards",
    "/beds",
    "/departments",
    "/operating-theatres",
    "/surgeries",
    "/prescriptions",
    "/medications",
    "/pharmacy-stock",
    "/lab-tests",
    "/lab-results",
    "/radiology",
    "/vitals",
    "/allergies",
    "/diagnoses",
    "/treatments",
    "/immunizations",
    "/invoices",
    "/payments",
    "/insurance-claims",
    "/suppliers",
    "/purchase-orders",
    "/emergency-cases",
];
