use std::collections::HashSet;

use log::warn;
use serde::Serialize;

use crate::catalog::{Catalog, CatalogError, InMemoryCatalog};
use crate::climate::is_known_zone;
use crate::generator::parse_start_date;
use crate::model::{GenerateRequest, PlantStartPoint};

// ---------------------------------------------------------------------------
// Wizard gates
// ---------------------------------------------------------------------------

/// True iff `zone_id` exists and belongs to `garden_id`. Lookup failures are
/// logged and reported as `false`.
pub fn zone_belongs_to_garden<C: Catalog + ?Sized>(
    catalog: &C,
    garden_id: &str,
    zone_id: &str,
) -> bool {
    match catalog.zone(zone_id) {
        Ok(zone) => zone.is_some_and(|z| z.garden_id == garden_id),
        Err(e) => {
            warn!(
                "zone check failed: garden_id={} zone_id={} error={}",
                garden_id, zone_id, e
            );
            false
        }
    }
}

/// True iff the configuration exists and every plant owns a stage template
/// named like its start point (case-insensitive). Lookup failures are logged
/// and reported as `false`.
pub fn configuration_compatible_with_plants<C: Catalog + ?Sized>(
    catalog: &C,
    configuration_id: &str,
    plants: &[PlantStartPoint],
) -> bool {
    match check_compatibility(catalog, configuration_id, plants) {
        Ok(compatible) => compatible,
        Err(e) => {
            warn!(
                "compatibility check failed: configuration_id={} error={}",
                configuration_id, e
            );
            false
        }
    }
}

fn check_compatibility<C: Catalog + ?Sized>(
    catalog: &C,
    configuration_id: &str,
    plants: &[PlantStartPoint],
) -> Result<bool, CatalogError> {
    if catalog.configuration(configuration_id)?.is_none() {
        return Ok(false);
    }
    for plant in plants {
        let wanted = plant.start_point.to_lowercase();
        let matched = catalog
            .stage_templates_for_plant(&plant.plant_id)?
            .iter()
            .any(|t| t.name.to_lowercase() == wanted);
        if !matched {
            return Ok(false);
        }
    }
    Ok(true)
}

// ---------------------------------------------------------------------------
// Validation result types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Request validation
// ---------------------------------------------------------------------------

/// Check a generation request the way the wizard form does before it lets
/// the user preview the calendar. Errors block generation; warnings describe
/// input the generator will silently skip.
pub fn validate_request<C: Catalog + ?Sized>(
    catalog: &C,
    request: &GenerateRequest,
) -> ValidationResult {
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    if let Err(e) = check_request(catalog, request, &mut errors, &mut warnings) {
        warn!("request validation failed: error={}", e);
        errors.push(format!("Catalog lookup failed: {}", e));
    }

    ValidationResult { errors, warnings }
}

fn check_request<C: Catalog + ?Sized>(
    catalog: &C,
    request: &GenerateRequest,
    errors: &mut Vec<String>,
    warnings: &mut Vec<String>,
) -> Result<(), CatalogError> {
    // -----------------------------------------------------------------------
    // Errors: references
    // -----------------------------------------------------------------------
    if catalog.configuration(&request.configuration_id)?.is_none() {
        errors.push(format!(
            "Configuration '{}' doesn't exist",
            request.configuration_id
        ));
    }

    if catalog.garden(&request.garden_id)?.is_none() {
        errors.push(format!("Garden '{}' doesn't exist", request.garden_id));
    } else if !zone_belongs_to_garden(catalog, &request.garden_id, &request.zone_id) {
        errors.push(format!(
            "Zone '{}' doesn't belong to garden '{}'",
            request.zone_id, request.garden_id
        ));
    }

    // -----------------------------------------------------------------------
    // Per-plant checks
    // -----------------------------------------------------------------------
    if request.plants.is_empty() {
        errors.push("No plants selected -- add at least one plant".to_string());
    }

    for selection in &request.plants {
        if selection.quantity == 0 {
            errors.push(format!(
                "Plant '{}' has quantity 0 -- quantity must be at least 1",
                selection.plant_id
            ));
        }

        if parse_start_date(&selection.start_date).is_none() {
            errors.push(format!(
                "Plant '{}' has an invalid start date '{}'",
                selection.plant_id, selection.start_date
            ));
        }

        if catalog.plant(&selection.plant_id)?.is_none() {
            warnings.push(format!(
                "Plant '{}' isn't in the catalog -- it will be skipped",
                selection.plant_id
            ));
        }

        if let Some(variety_id) = &selection.variety_id {
            match catalog.variety(variety_id)? {
                None => warnings.push(format!(
                    "Variety '{}' isn't in the catalog -- plant '{}' will be shown without it",
                    variety_id, selection.plant_id
                )),
                Some(v) if v.plant_id != selection.plant_id => warnings.push(format!(
                    "Variety '{}' belongs to plant '{}', not '{}'",
                    v.name, v.plant_id, selection.plant_id
                )),
                Some(_) => {}
            }
        }
    }

    // -----------------------------------------------------------------------
    // Overrides
    // -----------------------------------------------------------------------
    for (i, step) in request.cultivation_steps.iter().enumerate() {
        if step.duration < 1 {
            errors.push(format!(
                "Cultivation step {} has duration {} -- durations must be at least 1 day",
                i, step.duration
            ));
        }
    }

    for keyed in &request.stage_overrides {
        if keyed.duration < 1 {
            errors.push(format!(
                "Stage '{}' of plant '{}' has duration {} -- durations must be at least 1 day",
                keyed.stage_id, keyed.plant_id, keyed.duration
            ));
        }
        let owned = catalog
            .stage_templates_for_plant(&keyed.plant_id)?
            .iter()
            .any(|t| t.id == keyed.stage_id);
        if !owned {
            warnings.push(format!(
                "Override for plant '{}' stage '{}' matches no stage template -- it will be ignored",
                keyed.plant_id, keyed.stage_id
            ));
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Catalog validation
// ---------------------------------------------------------------------------

fn push_duplicates<'a>(
    errors: &mut Vec<String>,
    entity: &str,
    ids: impl Iterator<Item = &'a str>,
) {
    let mut seen: HashSet<&str> = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            errors.push(format!(
                "Duplicate {} ID '{}' -- each {} must have a unique ID",
                entity, id, entity
            ));
        }
    }
}

/// Check the integrity of reference data before it is handed to the
/// generator. Errors describe data the generator would mishandle; warnings
/// describe data it will skip.
pub fn validate_catalog(catalog: &InMemoryCatalog) -> ValidationResult {
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    // -----------------------------------------------------------------------
    // Error: duplicate IDs
    // -----------------------------------------------------------------------
    push_duplicates(&mut errors, "plant", catalog.plants.iter().map(|p| p.id.as_str()));
    push_duplicates(&mut errors, "variety", catalog.varieties.iter().map(|v| v.id.as_str()));
    push_duplicates(
        &mut errors,
        "stage type",
        catalog.stage_types.iter().map(|t| t.id.as_str()),
    );
    push_duplicates(
        &mut errors,
        "stage template",
        catalog.stage_templates.iter().map(|t| t.id.as_str()),
    );
    push_duplicates(
        &mut errors,
        "configuration",
        catalog.configurations.iter().map(|c| c.id.as_str()),
    );
    push_duplicates(&mut errors, "garden", catalog.gardens.iter().map(|g| g.id.as_str()));
    push_duplicates(&mut errors, "zone", catalog.zones.iter().map(|z| z.id.as_str()));

    let plant_ids: HashSet<&str> = catalog.plants.iter().map(|p| p.id.as_str()).collect();
    let stage_type_ids: HashSet<&str> =
        catalog.stage_types.iter().map(|t| t.id.as_str()).collect();
    let garden_ids: HashSet<&str> = catalog.gardens.iter().map(|g| g.id.as_str()).collect();

    // -----------------------------------------------------------------------
    // Stage templates
    // -----------------------------------------------------------------------
    for template in &catalog.stage_templates {
        if template.default_duration < 1 {
            errors.push(format!(
                "Stage template '{}' has default duration {} -- it must be at least 1 day",
                template.id, template.default_duration
            ));
        }
        if !plant_ids.contains(template.plant_id.as_str()) {
            warnings.push(format!(
                "Stage template '{}' belongs to unknown plant '{}'",
                template.id, template.plant_id
            ));
        }
        if !stage_type_ids.contains(template.stage_type_id.as_str()) {
            warnings.push(format!(
                "Stage template '{}' has unknown stage type '{}' -- it will never produce events",
                template.id, template.stage_type_id
            ));
        }
    }

    for variety in &catalog.varieties {
        if !plant_ids.contains(variety.plant_id.as_str()) {
            warnings.push(format!(
                "Variety '{}' belongs to unknown plant '{}'",
                variety.id, variety.plant_id
            ));
        }
    }

    for zone in &catalog.zones {
        if !garden_ids.contains(zone.garden_id.as_str()) {
            errors.push(format!(
                "Zone '{}' belongs to unknown garden '{}'",
                zone.id, zone.garden_id
            ));
        }
    }

    for config in &catalog.configurations {
        if !is_known_zone(&config.parameters.climate) {
            warnings.push(format!(
                "Configuration '{}' uses climate '{}' which has no offset -- 0 days will be applied",
                config.id, config.parameters.climate
            ));
        }
    }

    ValidationResult { errors, warnings }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
