use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, CatalogError};
use crate::generator::{display_name, fired_stages, StepOverrides};
use crate::model::GenerateRequest;

// ---------------------------------------------------------------------------
// Summary types
// ---------------------------------------------------------------------------

/// One stage line of the recap: `"{plant} - {stage type}"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StageSummary {
    pub label: String,
    /// Days, before climate and culture offsets.
    pub duration: i64,
    pub is_required: bool,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlantSummary {
    pub plant_id: String,
    /// Plant name with the variety in parentheses when one is chosen.
    pub label: String,
    pub quantity: u32,
    pub start_date: String,
    pub stages: Vec<StageSummary>,
}

/// Recap shown to the user before the calendar is generated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    pub configuration_name: Option<String>,
    pub garden_name: Option<String>,
    pub zone_name: Option<String>,
    pub plant_count: usize,
    /// Number of events the generator will emit for this request.
    pub total_events: usize,
    pub plants: Vec<PlantSummary>,
}

// ---------------------------------------------------------------------------
// Summarize implementation
// ---------------------------------------------------------------------------

/// Build the recap for `request`. Unknown plants are left out; unknown
/// configuration, garden or zone only leave their name empty.
pub fn summarize<C: Catalog + ?Sized>(
    catalog: &C,
    request: &GenerateRequest,
) -> Result<PlanSummary, CatalogError> {
    let overrides = StepOverrides::from_request(catalog, request)?;

    let mut plants = Vec::with_capacity(request.plants.len());
    for (index, selection) in request.plants.iter().enumerate() {
        let Some(plant) = catalog.plant(&selection.plant_id)? else {
            continue;
        };
        let label = display_name(catalog, &plant, selection.variety_id.as_deref())?;

        let stages = fired_stages(catalog, index, &plant.id, &overrides)?
            .into_iter()
            .map(|stage| StageSummary {
                label: format!("{} - {}", plant.name, stage.stage_type.name),
                duration: stage.duration,
                is_required: stage.template.is_required,
                description: stage.stage_type.description,
            })
            .collect();

        plants.push(PlantSummary {
            plant_id: plant.id,
            label,
            quantity: selection.quantity,
            start_date: selection.start_date.clone(),
            stages,
        });
    }

    let total_events = plants.iter().map(|p| p.stages.len()).sum();

    Ok(PlanSummary {
        configuration_name: catalog
            .configuration(&request.configuration_id)?
            .map(|c| c.name),
        garden_name: catalog.garden(&request.garden_id)?.map(|g| g.name),
        zone_name: catalog.zone(&request.zone_id)?.map(|z| z.name),
        plant_count: request.plants.len(),
        total_events,
        plants,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
