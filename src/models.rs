//! Input records and per-record outcomes.
//!
//! Field names on the serialized forms match what the spreadsheet sink
//! expects (`validacion`, `costo`, `totalRevisados`, ...), so an outcome can
//! be written back against its originating row without translation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PortalError;
use crate::recon::StatsSnapshot;

/// One expediente to reconcile: a numeric id plus the cost the spreadsheet
/// says the portal should report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpedienteRequest {
    pub id: String,
    pub expected_cost: Decimal,
}

impl ExpedienteRequest {
    /// Ids are digits-only; anything else is rejected before it reaches the
    /// browser.
    pub fn new(id: impl Into<String>, expected_cost: Decimal) -> Result<Self, PortalError> {
        let id = id.into();
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
            return Err(PortalError::InvalidExpedienteId(id));
        }
        Ok(Self { id, expected_cost })
    }
}

/// Final classification of one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Validation {
    #[serde(rename = "Aceptado")]
    Accepted,
    #[serde(rename = "No aceptado")]
    NotAccepted,
    #[serde(rename = "Sin datos")]
    NoData,
    #[serde(rename = "Error en consulta")]
    ErrorInQuery,
    #[serde(rename = "Error en aceptación")]
    ErrorInAcceptance,
}

impl Validation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Validation::Accepted => "Aceptado",
            Validation::NotAccepted => "No aceptado",
            Validation::NoData => "Sin datos",
            Validation::ErrorInQuery => "Error en consulta",
            Validation::ErrorInAcceptance => "Error en aceptación",
        }
    }
}

impl std::fmt::Display for Validation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cells extracted from the first result row of the pending-services grid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow {
    pub costo: String,
    pub estatus: String,
    pub notas: String,
    pub fecha_registro: String,
    pub servicio: String,
    pub subservicio: String,
}

/// What the pipeline returns for one request. Produced exactly once per
/// request and never mutated after return.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub costo: String,
    pub estatus: String,
    pub notas: String,
    #[serde(rename = "fechaRegistro")]
    pub fecha_registro: String,
    pub servicio: String,
    pub subservicio: String,
    pub validacion: Validation,
    pub stats: StatsSnapshot,
}

impl SearchOutcome {
    pub(crate) fn from_row(
        row: ResultRow,
        costo: String,
        validacion: Validation,
        stats: StatsSnapshot,
    ) -> Self {
        Self {
            costo,
            estatus: row.estatus,
            notas: row.notas,
            fecha_registro: row.fecha_registro,
            servicio: row.servicio,
            subservicio: row.subservicio,
            validacion,
            stats,
        }
    }

    /// No usable cost for this record. Other cells are carried through when
    /// the grid rendered a row at all.
    pub(crate) fn no_data(row: Option<ResultRow>, stats: StatsSnapshot) -> Self {
        let row = row.unwrap_or_default();
        Self {
            costo: String::new(),
            estatus: row.estatus,
            notas: row.notas,
            fecha_registro: row.fecha_registro,
            servicio: row.servicio,
            subservicio: row.subservicio,
            validacion: Validation::NoData,
            stats,
        }
    }

    /// All retry attempts for this record failed.
    pub(crate) fn error_in_query(stats: StatsSnapshot) -> Self {
        Self {
            costo: String::new(),
            estatus: String::new(),
            notas: String::new(),
            fecha_registro: String::new(),
            servicio: String::new(),
            subservicio: String::new(),
            validacion: Validation::ErrorInQuery,
            stats,
        }
    }
}
