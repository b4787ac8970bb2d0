//! Reglas de selección de vehículos
//!
//! Cada programación lleva una regla (`rule_type` + `rule_value`) que decide
//! qué vehículos de la flota le aplican. Se modela como variante etiquetada
//! con un matcher por variante; añadir un tipo de regla nuevo no toca los
//! matchers existentes.

use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::models::vehicle::Vehicle;

/// Atributos de vehículo consultables desde una regla BY_ATTRIBUTE.
/// Enum cerrado: los nombres desconocidos se rechazan al guardar la
/// programación en lugar de no casar silenciosamente en la expansión.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleAttribute {
    Name,
    Vin,
    Type,
    Make,
    Model,
    Year,
    Group,
    Labels,
}

impl VehicleAttribute {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "name" => Some(Self::Name),
            "vin" => Some(Self::Vin),
            "type" => Some(Self::Type),
            "make" => Some(Self::Make),
            "model" => Some(Self::Model),
            "year" => Some(Self::Year),
            "group" => Some(Self::Group),
            "labels" => Some(Self::Labels),
            _ => None,
        }
    }

    /// Comparación tipada contra el vehículo. `labels` es el único atributo
    /// lista: casa por pertenencia en vez de por igualdad.
    pub fn matches(self, vehicle: &Vehicle, value: &str) -> bool {
        match self {
            Self::Name => vehicle.name == value,
            Self::Vin => vehicle.vin == value,
            Self::Type => vehicle.vehicle_type.as_deref() == Some(value),
            Self::Make => vehicle.make.as_deref() == Some(value),
            Self::Model => vehicle.model.as_deref() == Some(value),
            Self::Year => vehicle.year.is_some_and(|y| y.to_string() == value),
            Self::Group => vehicle.vehicle_group.as_deref() == Some(value),
            Self::Labels => vehicle.labels.iter().any(|label| label == value),
        }
    }
}

/// Payload serializado de una regla BY_ATTRIBUTE
#[derive(Debug, Deserialize)]
pub struct AttributeRulePayload {
    #[serde(default)]
    pub attribute: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Error)]
pub enum RuleParseError {
    #[error("rule_value BY_ATTRIBUTE con JSON inválido: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("atributo de vehículo desconocido: '{0}'")]
    UnknownAttribute(String),
    #[error("rule_value SPECIFIC_VEHICLE no es un id de vehículo: '{0}'")]
    InvalidVehicleId(String),
}

/// Regla de selección ya interpretada
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleRule {
    AllVehicles,
    SpecificVehicle(Uuid),
    ByAttribute {
        attribute: VehicleAttribute,
        value: String,
    },
}

impl ScheduleRule {
    /// Interpretar la pareja (`rule_type`, `rule_value`) almacenada.
    ///
    /// Tipos de regla desconocidos y payloads ausentes o incompletos caen
    /// al comportamiento por defecto (toda la flota), igual que el sistema
    /// original. Los payloads malformados son un error: el motor los
    /// registra y la programación no casa con ningún vehículo.
    pub fn parse(rule_type: &str, rule_value: Option<&str>) -> Result<Self, RuleParseError> {
        match rule_type {
            "SPECIFIC_VEHICLE" => match rule_value {
                Some(raw) => raw
                    .parse()
                    .map(Self::SpecificVehicle)
                    .map_err(|_| RuleParseError::InvalidVehicleId(raw.to_string())),
                None => Ok(Self::AllVehicles),
            },
            "BY_ATTRIBUTE" => match rule_value {
                Some(raw) => {
                    let payload: AttributeRulePayload = serde_json::from_str(raw)?;
                    match (payload.attribute, payload.value) {
                        (Some(attribute), Some(value)) => {
                            let attribute = VehicleAttribute::parse(&attribute)
                                .ok_or(RuleParseError::UnknownAttribute(attribute))?;
                            Ok(Self::ByAttribute { attribute, value })
                        }
                        // Payload incompleto: fallthrough a toda la flota
                        _ => Ok(Self::AllVehicles),
                    }
                }
                None => Ok(Self::AllVehicles),
            },
            // ALL_VEHICLES y cualquier tipo desconocido
            _ => Ok(Self::AllVehicles),
        }
    }

    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        match self {
            Self::AllVehicles => true,
            Self::SpecificVehicle(id) => vehicle.id == *id,
            Self::ByAttribute { attribute, value } => attribute.matches(vehicle, value),
        }
    }
}
