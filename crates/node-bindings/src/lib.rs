#![deny(clippy::all)]

use garden_planner_engine::catalog as store;
use garden_planner_engine::model as engine;
use garden_planner_engine::{generator, summary, validator};
use napi_derive::napi;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

#[napi(string_enum)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageKind {
    #[napi(value = "seed")]
    Seed,
    #[napi(value = "seedling")]
    Seedling,
    #[napi(value = "transplant")]
    Transplant,
}

#[napi(string_enum)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartMethod {
    #[napi(value = "direct-sowing")]
    DirectSowing,
    #[napi(value = "indoor-sowing")]
    IndoorSowing,
    #[napi(value = "transplant")]
    Transplant,
    #[napi(value = "cutting")]
    Cutting,
}

#[napi(string_enum)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventStatus {
    #[napi(value = "pending")]
    Pending,
    #[napi(value = "completed")]
    Completed,
    #[napi(value = "cancelled")]
    Cancelled,
}

// ---------------------------------------------------------------------------
// Enum conversions: napi <-> engine
// ---------------------------------------------------------------------------

impl From<StageKind> for engine::StageKind {
    fn from(v: StageKind) -> Self {
        match v {
            StageKind::Seed => engine::StageKind::Seed,
            StageKind::Seedling => engine::StageKind::Seedling,
            StageKind::Transplant => engine::StageKind::Transplant,
        }
    }
}

impl From<engine::StageKind> for StageKind {
    fn from(v: engine::StageKind) -> Self {
        match v {
            engine::StageKind::Seed => StageKind::Seed,
            engine::StageKind::Seedling => StageKind::Seedling,
            engine::StageKind::Transplant => StageKind::Transplant,
        }
    }
}

impl From<StartMethod> for engine::StartMethod {
    fn from(v: StartMethod) -> Self {
        match v {
            StartMethod::DirectSowing => engine::StartMethod::DirectSowing,
            StartMethod::IndoorSowing => engine::StartMethod::IndoorSowing,
            StartMethod::Transplant => engine::StartMethod::Transplant,
            StartMethod::Cutting => engine::StartMethod::Cutting,
        }
    }
}

impl From<engine::EventStatus> for EventStatus {
    fn from(v: engine::EventStatus) -> Self {
        match v {
            engine::EventStatus::Pending => EventStatus::Pending,
            engine::EventStatus::Completed => EventStatus::Completed,
            engine::EventStatus::Cancelled => EventStatus::Cancelled,
        }
    }
}

// ---------------------------------------------------------------------------
// Mirror types: catalog
// ---------------------------------------------------------------------------

#[napi(object)]
#[derive(Debug, Clone)]
pub struct Plant {
    pub id: String,
    pub name: String,
    pub cultivation_stages: Vec<StageKind>,
    pub scientific_name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl From<Plant> for engine::Plant {
    fn from(v: Plant) -> Self {
        engine::Plant {
            id: v.id,
            name: v.name,
            cultivation_stages: v.cultivation_stages.into_iter().map(Into::into).collect(),
            scientific_name: v.scientific_name,
            description: v.description,
            image_url: v.image_url,
        }
    }
}

impl From<engine::Plant> for Plant {
    fn from(v: engine::Plant) -> Self {
        Plant {
            id: v.id,
            name: v.name,
            cultivation_stages: v.cultivation_stages.into_iter().map(Into::into).collect(),
            scientific_name: v.scientific_name,
            description: v.description,
            image_url: v.image_url,
        }
    }
}

#[napi(object)]
#[derive(Debug, Clone)]
pub struct Variety {
    pub id: String,
    pub plant_id: String,
    pub name: String,
}

impl From<Variety> for engine::Variety {
    fn from(v: Variety) -> Self {
        engine::Variety {
            id: v.id,
            plant_id: v.plant_id,
            name: v.name,
        }
    }
}

impl From<engine::Variety> for Variety {
    fn from(v: engine::Variety) -> Self {
        Variety {
            id: v.id,
            plant_id: v.plant_id,
            name: v.name,
        }
    }
}

#[napi(object)]
#[derive(Debug, Clone)]
pub struct StageType {
    pub id: String,
    pub name: String,
    pub code: String,
    pub description: String,
}

impl From<StageType> for engine::StageType {
    fn from(v: StageType) -> Self {
        engine::StageType {
            id: v.id,
            name: v.name,
            code: v.code,
            description: v.description,
        }
    }
}

impl From<engine::StageType> for StageType {
    fn from(v: engine::StageType) -> Self {
        StageType {
            id: v.id,
            name: v.name,
            code: v.code,
            description: v.description,
        }
    }
}

#[napi(object)]
#[derive(Debug, Clone)]
pub struct StageTemplate {
    pub id: String,
    pub plant_id: String,
    pub stage_type_id: String,
    pub name: String,
    pub default_duration: i64,
    pub is_required: bool,
}

impl From<StageTemplate> for engine::StageTemplate {
    fn from(v: StageTemplate) -> Self {
        engine::StageTemplate {
            id: v.id,
            plant_id: v.plant_id,
            stage_type_id: v.stage_type_id,
            name: v.name,
            default_duration: v.default_duration,
            is_required: v.is_required,
        }
    }
}

impl From<engine::StageTemplate> for StageTemplate {
    fn from(v: engine::StageTemplate) -> Self {
        StageTemplate {
            id: v.id,
            plant_id: v.plant_id,
            stage_type_id: v.stage_type_id,
            name: v.name,
            default_duration: v.default_duration,
            is_required: v.is_required,
        }
    }
}

#[napi(object)]
#[derive(Debug, Clone)]
pub struct ConfigurationParameters {
    pub climate: String,
    pub preferred_days: Vec<String>,
    pub culture_offset: i64,
}

impl From<ConfigurationParameters> for engine::ConfigurationParameters {
    fn from(v: ConfigurationParameters) -> Self {
        engine::ConfigurationParameters {
            climate: v.climate,
            preferred_days: v.preferred_days,
            culture_offset: v.culture_offset,
        }
    }
}

impl From<engine::ConfigurationParameters> for ConfigurationParameters {
    fn from(v: engine::ConfigurationParameters) -> Self {
        ConfigurationParameters {
            climate: v.climate,
            preferred_days: v.preferred_days,
            culture_offset: v.culture_offset,
        }
    }
}

#[napi(object)]
#[derive(Debug, Clone)]
pub struct Configuration {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub parameters: ConfigurationParameters,
}

impl From<Configuration> for engine::Configuration {
    fn from(v: Configuration) -> Self {
        engine::Configuration {
            id: v.id,
            user_id: v.user_id,
            name: v.name,
            parameters: v.parameters.into(),
        }
    }
}

impl From<engine::Configuration> for Configuration {
    fn from(v: engine::Configuration) -> Self {
        Configuration {
            id: v.id,
            user_id: v.user_id,
            name: v.name,
            parameters: v.parameters.into(),
        }
    }
}

#[napi(object)]
#[derive(Debug, Clone)]
pub struct Garden {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub climate_zone: Option<String>,
    pub soil_types: Vec<String>,
    pub area: f64,
}

impl From<Garden> for engine::Garden {
    fn from(v: Garden) -> Self {
        engine::Garden {
            id: v.id,
            name: v.name,
            description: v.description,
            climate_zone: v.climate_zone,
            soil_types: v.soil_types,
            area: v.area,
        }
    }
}

impl From<engine::Garden> for Garden {
    fn from(v: engine::Garden) -> Self {
        Garden {
            id: v.id,
            name: v.name,
            description: v.description,
            climate_zone: v.climate_zone,
            soil_types: v.soil_types,
            area: v.area,
        }
    }
}

#[napi(object)]
#[derive(Debug, Clone)]
pub struct GardenZone {
    pub id: String,
    pub garden_id: String,
    pub name: String,
    pub description: Option<String>,
}

impl From<GardenZone> for engine::GardenZone {
    fn from(v: GardenZone) -> Self {
        engine::GardenZone {
            id: v.id,
            garden_id: v.garden_id,
            name: v.name,
            description: v.description,
        }
    }
}

impl From<engine::GardenZone> for GardenZone {
    fn from(v: engine::GardenZone) -> Self {
        GardenZone {
            id: v.id,
            garden_id: v.garden_id,
            name: v.name,
            description: v.description,
        }
    }
}

/// Reference data handed to every call. Omit it to use the seeded catalog.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct Catalog {
    pub plants: Vec<Plant>,
    pub varieties: Vec<Variety>,
    pub stage_types: Vec<StageType>,
    pub stage_templates: Vec<StageTemplate>,
    pub configurations: Vec<Configuration>,
    pub gardens: Vec<Garden>,
    pub zones: Vec<GardenZone>,
}

impl From<Catalog> for store::InMemoryCatalog {
    fn from(v: Catalog) -> Self {
        store::InMemoryCatalog {
            plants: v.plants.into_iter().map(Into::into).collect(),
            varieties: v.varieties.into_iter().map(Into::into).collect(),
            stage_types: v.stage_types.into_iter().map(Into::into).collect(),
            stage_templates: v.stage_templates.into_iter().map(Into::into).collect(),
            configurations: v.configurations.into_iter().map(Into::into).collect(),
            gardens: v.gardens.into_iter().map(Into::into).collect(),
            zones: v.zones.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<store::InMemoryCatalog> for Catalog {
    fn from(v: store::InMemoryCatalog) -> Self {
        Catalog {
            plants: v.plants.into_iter().map(Into::into).collect(),
            varieties: v.varieties.into_iter().map(Into::into).collect(),
            stage_types: v.stage_types.into_iter().map(Into::into).collect(),
            stage_templates: v.stage_templates.into_iter().map(Into::into).collect(),
            configurations: v.configurations.into_iter().map(Into::into).collect(),
            gardens: v.gardens.into_iter().map(Into::into).collect(),
            zones: v.zones.into_iter().map(Into::into).collect(),
        }
    }
}

fn resolve_catalog(catalog: Option<Catalog>) -> store::InMemoryCatalog {
    catalog
        .map(Into::into)
        .unwrap_or_else(store::InMemoryCatalog::seeded)
}

// ---------------------------------------------------------------------------
// Mirror types: generation input
// ---------------------------------------------------------------------------

#[napi(object)]
#[derive(Debug, Clone)]
pub struct PlantSelection {
    pub plant_id: String,
    pub variety_id: Option<String>,
    pub quantity: u32,
    pub start_point: StartMethod,
    pub start_date: String,
}

impl From<PlantSelection> for engine::PlantSelection {
    fn from(v: PlantSelection) -> Self {
        engine::PlantSelection {
            plant_id: v.plant_id,
            variety_id: v.variety_id,
            quantity: v.quantity,
            start_point: v.start_point.into(),
            start_date: v.start_date,
        }
    }
}

#[napi(object)]
#[derive(Debug, Clone)]
pub struct StepOverride {
    pub enabled: bool,
    pub duration: i64,
}

impl From<StepOverride> for engine::StepOverride {
    fn from(v: StepOverride) -> Self {
        engine::StepOverride {
            enabled: v.enabled,
            duration: v.duration,
        }
    }
}

#[napi(object)]
#[derive(Debug, Clone)]
pub struct StageOverride {
    pub plant_id: String,
    pub stage_id: String,
    pub enabled: bool,
    pub duration: i64,
}

impl From<StageOverride> for engine::StageOverride {
    fn from(v: StageOverride) -> Self {
        engine::StageOverride {
            plant_id: v.plant_id,
            stage_id: v.stage_id,
            enabled: v.enabled,
            duration: v.duration,
        }
    }
}

#[napi(object)]
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub configuration_id: String,
    pub garden_id: String,
    pub zone_id: Option<String>,
    pub plants: Vec<PlantSelection>,
    pub cultivation_steps: Option<Vec<StepOverride>>,
    pub stage_overrides: Option<Vec<StageOverride>>,
}

impl From<GenerateRequest> for engine::GenerateRequest {
    fn from(v: GenerateRequest) -> Self {
        engine::GenerateRequest {
            configuration_id: v.configuration_id,
            garden_id: v.garden_id,
            zone_id: v.zone_id.unwrap_or_default(),
            plants: v.plants.into_iter().map(Into::into).collect(),
            cultivation_steps: v
                .cultivation_steps
                .unwrap_or_default()
                .into_iter()
                .map(Into::into)
                .collect(),
            stage_overrides: v
                .stage_overrides
                .unwrap_or_default()
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}

#[napi(object)]
#[derive(Debug, Clone)]
pub struct PlantStartPoint {
    pub plant_id: String,
    pub start_point: String,
}

impl From<PlantStartPoint> for engine::PlantStartPoint {
    fn from(v: PlantStartPoint) -> Self {
        engine::PlantStartPoint {
            plant_id: v.plant_id,
            start_point: v.start_point,
        }
    }
}

// ---------------------------------------------------------------------------
// Mirror types: output
// ---------------------------------------------------------------------------

#[napi(object)]
#[derive(Debug, Clone)]
pub struct GeneratedEvent {
    pub title: String,
    pub description: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub plant_name: String,
    #[napi(js_name = "type")]
    pub event_type: String,
    pub status: EventStatus,
}

impl From<engine::GeneratedEvent> for GeneratedEvent {
    fn from(v: engine::GeneratedEvent) -> Self {
        GeneratedEvent {
            title: v.title,
            description: v.description,
            date: v.date.format("%Y-%m-%d").to_string(),
            plant_name: v.plant_name,
            event_type: v.event_type,
            status: v.status.into(),
        }
    }
}

#[napi(object)]
#[derive(Debug, Clone)]
pub struct StageSummary {
    pub label: String,
    pub duration: i64,
    pub is_required: bool,
    pub description: String,
}

impl From<summary::StageSummary> for StageSummary {
    fn from(v: summary::StageSummary) -> Self {
        StageSummary {
            label: v.label,
            duration: v.duration,
            is_required: v.is_required,
            description: v.description,
        }
    }
}

#[napi(object)]
#[derive(Debug, Clone)]
pub struct PlantSummary {
    pub plant_id: String,
    pub label: String,
    pub quantity: u32,
    pub start_date: String,
    pub stages: Vec<StageSummary>,
}

impl From<summary::PlantSummary> for PlantSummary {
    fn from(v: summary::PlantSummary) -> Self {
        PlantSummary {
            plant_id: v.plant_id,
            label: v.label,
            quantity: v.quantity,
            start_date: v.start_date,
            stages: v.stages.into_iter().map(Into::into).collect(),
        }
    }
}

#[napi(object)]
#[derive(Debug, Clone)]
pub struct PlanSummary {
    pub configuration_name: Option<String>,
    pub garden_name: Option<String>,
    pub zone_name: Option<String>,
    pub plant_count: u32,
    pub total_events: u32,
    pub plants: Vec<PlantSummary>,
}

impl From<summary::PlanSummary> for PlanSummary {
    fn from(v: summary::PlanSummary) -> Self {
        PlanSummary {
            configuration_name: v.configuration_name,
            garden_name: v.garden_name,
            zone_name: v.zone_name,
            plant_count: v.plant_count as u32,
            total_events: v.total_events as u32,
            plants: v.plants.into_iter().map(Into::into).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation result
// ---------------------------------------------------------------------------

#[napi(object)]
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl From<validator::ValidationResult> for ValidationResult {
    fn from(v: validator::ValidationResult) -> Self {
        ValidationResult {
            errors: v.errors,
            warnings: v.warnings,
        }
    }
}

// ---------------------------------------------------------------------------
// Exported functions
// ---------------------------------------------------------------------------

/// The reference data shipped with the engine.
#[napi]
pub fn seeded_catalog() -> Catalog {
    store::InMemoryCatalog::seeded().into()
}

/// Generate the cultivation calendar. Returns an error only for unparseable
/// start dates or dates outside the supported range.
#[napi]
pub fn generate_events(
    request: GenerateRequest,
    catalog: Option<Catalog>,
) -> napi::Result<Vec<GeneratedEvent>> {
    let catalog = resolve_catalog(catalog);
    let request = engine::GenerateRequest::from(request);

    generator::generate_events(&catalog, &request)
        .map(|events| events.into_iter().map(Into::into).collect())
        .map_err(|e| napi::Error::from_reason(e.to_string()))
}

/// Recap of the stages that will fire for each selected plant.
#[napi]
pub fn summarize(request: GenerateRequest, catalog: Option<Catalog>) -> napi::Result<PlanSummary> {
    let catalog = resolve_catalog(catalog);
    let request = engine::GenerateRequest::from(request);

    summary::summarize(&catalog, &request)
        .map(Into::into)
        .map_err(|e| napi::Error::from_reason(e.to_string()))
}

/// Validate a generation request and return errors and warnings.
#[napi]
pub fn validate_request(request: GenerateRequest, catalog: Option<Catalog>) -> ValidationResult {
    let catalog = resolve_catalog(catalog);
    let request = engine::GenerateRequest::from(request);
    validator::validate_request(&catalog, &request).into()
}

/// Check the integrity of a catalog before using it.
#[napi]
pub fn validate_catalog(catalog: Catalog) -> ValidationResult {
    validator::validate_catalog(&catalog.into()).into()
}

#[napi]
pub fn zone_belongs_to_garden(garden_id: String, zone_id: String, catalog: Option<Catalog>) -> bool {
    let catalog = resolve_catalog(catalog);
    validator::zone_belongs_to_garden(&catalog, &garden_id, &zone_id)
}

#[napi]
pub fn configuration_compatible_with_plants(
    configuration_id: String,
    plants: Vec<PlantStartPoint>,
    catalog: Option<Catalog>,
) -> bool {
    let catalog = resolve_catalog(catalog);
    let plants: Vec<engine::PlantStartPoint> = plants.into_iter().map(Into::into).collect();
    validator::configuration_compatible_with_plants(&catalog, &configuration_id, &plants)
}
