use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use utoipa::ToSchema;

use crate::orbit::{OrbitSummary, OrbitalElements};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ObjectCategory {
    HumanSpaceflight,
    Scientific,
    Communications,
    Navigation,
    EarthObservation,
    Weather,
    Military,
    Debris,
    #[default]
    Unknown,
}

/// A tracked object as exposed to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrbitalObject {
    pub id: String,
    pub name: String,
    pub category: ObjectCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launch_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    pub elements: OrbitalElements,
    pub orbit: OrbitSummary,
}

/// Short form used in search results.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ObjectSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub category: ObjectCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launch_date: Option<NaiveDate>,
}

impl From<&OrbitalObject> for ObjectSummary {
    fn from(object: &OrbitalObject) -> Self {
        ObjectSummary {
            id: object.id.clone(),
            name: object.name.clone(),
            category: object.category,
            launch_date: object.launch_date,
        }
    }
}

/// One entry of a catalog YAML file.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: ObjectCategory,
    #[serde(default)]
    pub launch_date: Option<NaiveDate>,
    #[serde(default)]
    pub operator: Option<String>,
    pub elements: OrbitalElements,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub objects: Vec<CatalogRecord>,
}
