use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which growing stages a plant can be started from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StageKind {
    Seed,
    Seedling,
    Transplant,
}

/// How the user intends to start a plant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum StartMethod {
    DirectSowing,
    IndoorSowing,
    Transplant,
    Cutting,
}

impl StartMethod {
    /// Wire identifier, identical to the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            StartMethod::DirectSowing => "direct-sowing",
            StartMethod::IndoorSowing => "indoor-sowing",
            StartMethod::Transplant => "transplant",
            StartMethod::Cutting => "cutting",
        }
    }
}

/// Lifecycle state of a calendar event. The generator only ever emits
/// `Pending`; the other states belong to whoever tracks the calendar later.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Pending,
    Completed,
    Cancelled,
}

// ---------------------------------------------------------------------------
// Catalog entities (read-only reference data)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    pub id: String,
    pub name: String,
    /// Stages this plant can be started from.
    #[serde(default)]
    pub cultivation_stages: Vec<StageKind>,
    #[serde(default)]
    pub scientific_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Variety {
    pub id: String,
    /// References a `Plant` by its ID.
    pub plant_id: String,
    pub name: String,
}

/// Category shared by stage templates across plants (sowing, harvesting...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StageType {
    pub id: String,
    pub name: String,
    /// Short code such as `SOWING`; becomes the `type` of generated events.
    pub code: String,
    pub description: String,
}

/// One cultivation step owned by a plant.
///
/// A plant's templates are stored in cultivation order. There is no explicit
/// sequence field: the generator walks them in declaration order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StageTemplate {
    pub id: String,
    pub plant_id: String,
    /// References a `StageType` by its ID.
    pub stage_type_id: String,
    pub name: String,
    /// Duration in days presented to the user as the initial override value.
    pub default_duration: i64,
    pub is_required: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationParameters {
    /// Climate zone identifier, e.g. `usda-zone-8`.
    pub climate: String,
    /// Informational only; the generator does not schedule around them.
    #[serde(default)]
    pub preferred_days: Vec<String>,
    /// Signed day shift applied to every fired stage.
    #[serde(default)]
    pub culture_offset: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub parameters: ConfigurationParameters,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Garden {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub climate_zone: Option<String>,
    #[serde(default)]
    pub soil_types: Vec<String>,
    /// Square metres.
    #[serde(default)]
    pub area: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GardenZone {
    pub id: String,
    /// References a `Garden` by its ID.
    pub garden_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Generation input
// ---------------------------------------------------------------------------

/// A plant the user wants to grow, as collected by the wizard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlantSelection {
    pub plant_id: String,
    #[serde(default)]
    pub variety_id: Option<String>,
    pub quantity: u32,
    pub start_point: StartMethod,
    /// Raw date string; parsed by the generator so that malformed input can
    /// be reported against the plant it belongs to.
    pub start_date: String,
}

/// Per-stage user choice in the legacy positional form.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StepOverride {
    pub enabled: bool,
    /// Days; replaces the template's default duration for this run.
    pub duration: i64,
}

/// Per-stage user choice addressed by plant and stage template.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StageOverride {
    pub plant_id: String,
    /// References a `StageTemplate` by its ID.
    pub stage_id: String,
    pub enabled: bool,
    pub duration: i64,
}

/// Everything the generator needs besides the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub configuration_id: String,
    pub garden_id: String,
    /// Carried for the wizard's benefit; zone membership is checked by the
    /// validator, not by the generator.
    #[serde(default)]
    pub zone_id: String,
    pub plants: Vec<PlantSelection>,
    /// Flattened overrides: plant `p`, stage `s` lives at
    /// `p * stage_count(p) + s`.
    #[serde(default)]
    pub cultivation_steps: Vec<StepOverride>,
    /// Keyed overrides. Take precedence over `cultivation_steps`.
    #[serde(default)]
    pub stage_overrides: Vec<StageOverride>,
}

/// The subset of a selection that the compatibility check looks at.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlantStartPoint {
    pub plant_id: String,
    pub start_point: String,
}

impl From<&PlantSelection> for PlantStartPoint {
    fn from(selection: &PlantSelection) -> Self {
        PlantStartPoint {
            plant_id: selection.plant_id.clone(),
            start_point: selection.start_point.as_str().to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Generation output
// ---------------------------------------------------------------------------

/// A single dated entry in the cultivation calendar.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedEvent {
    pub title: String,
    pub description: String,
    /// Serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub plant_name: String,
    /// The stage type code (`SOWING`, `HARVESTING`, ...).
    #[serde(rename = "type")]
    pub event_type: String,
    pub status: EventStatus,
}
