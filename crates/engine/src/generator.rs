use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta};
use log::{debug, warn};

use crate::catalog::{Catalog, CatalogError};
use crate::climate::climate_offset;
use crate::model::{
    EventStatus, GenerateRequest, GeneratedEvent, Plant, PlantSelection, StageTemplate, StageType,
    StepOverride,
};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("Plant '{plant_id}' (selection {selection}) has an invalid start date '{value}'")]
    DateParse {
        selection: usize,
        plant_id: String,
        value: String,
    },
    #[error("Plant '{plant_id}' stage '{stage_id}' falls outside the supported date range")]
    DateOutOfRange { plant_id: String, stage_id: String },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

// ---------------------------------------------------------------------------
// Date parsing
// ---------------------------------------------------------------------------

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a start date into a calendar date. Date-times keep only their date
/// component as written; no timezone conversion is applied.
pub fn parse_start_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    // Z or ±HH:MM suffixed timestamps
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
}

// ---------------------------------------------------------------------------
// Overrides
// ---------------------------------------------------------------------------

/// User overrides for the stages of each selection.
///
/// Positional overrides belong to a single selection, addressed by its index
/// in the request. Keyed overrides address `(plant_id, stage_template_id)`
/// and apply to every selection of that plant; they win over positional ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepOverrides {
    by_selection: HashMap<(usize, String), StepOverride>,
    by_plant: HashMap<(String, String), StepOverride>,
}

impl StepOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keyed override for every selection of `plant_id`.
    pub fn insert(&mut self, plant_id: &str, stage_id: &str, step: StepOverride) {
        self.by_plant
            .insert((plant_id.to_string(), stage_id.to_string()), step);
    }

    /// Override for one stage of the selection at `selection`.
    pub fn insert_for_selection(&mut self, selection: usize, stage_id: &str, step: StepOverride) {
        self.by_selection
            .insert((selection, stage_id.to_string()), step);
    }

    pub fn get(&self, selection: usize, plant_id: &str, stage_id: &str) -> Option<&StepOverride> {
        self.by_plant
            .get(&(plant_id.to_string(), stage_id.to_string()))
            .or_else(|| self.by_selection.get(&(selection, stage_id.to_string())))
    }

    /// Convert the positional form. The override for the selection at
    /// position `p` and its stage `s` is read from `p * stage_count(p) + s`;
    /// entries past the end of `steps` are simply absent. A plant selected
    /// twice gets one block per selection.
    pub fn from_flattened<C: Catalog + ?Sized>(
        catalog: &C,
        plants: &[PlantSelection],
        steps: &[StepOverride],
    ) -> Result<Self, CatalogError> {
        let mut overrides = Self::new();
        for (plant_index, selection) in plants.iter().enumerate() {
            let templates = catalog.stage_templates_for_plant(&selection.plant_id)?;
            let stride = templates.len();
            for (stage_index, template) in templates.iter().enumerate() {
                let Some(step) = steps.get(plant_index * stride + stage_index) else {
                    continue;
                };
                overrides.insert_for_selection(plant_index, &template.id, *step);
            }
        }
        Ok(overrides)
    }

    /// Merge both override forms carried by a request; keyed entries win.
    pub fn from_request<C: Catalog + ?Sized>(
        catalog: &C,
        request: &GenerateRequest,
    ) -> Result<Self, CatalogError> {
        let mut overrides = if request.cultivation_steps.is_empty() {
            Self::new()
        } else {
            Self::from_flattened(catalog, &request.plants, &request.cultivation_steps)?
        };
        for keyed in &request.stage_overrides {
            overrides.insert(
                &keyed.plant_id,
                &keyed.stage_id,
                StepOverride {
                    enabled: keyed.enabled,
                    duration: keyed.duration,
                },
            );
        }
        Ok(overrides)
    }
}

// ---------------------------------------------------------------------------
// Stage selection
// ---------------------------------------------------------------------------

/// A stage that will produce an event, with the duration to use for it.
#[derive(Debug, Clone)]
pub(crate) struct FiredStage {
    pub template: StageTemplate,
    pub stage_type: StageType,
    pub duration: i64,
}

/// Stages of the selection at `selection` (a `plant_id` planting) that fire
/// under `overrides`, in cultivation order.
///
/// A stage fires when its override is enabled or the template is required.
/// Required stages without an override fall back to the template default.
pub(crate) fn fired_stages<C: Catalog + ?Sized>(
    catalog: &C,
    selection: usize,
    plant_id: &str,
    overrides: &StepOverrides,
) -> Result<Vec<FiredStage>, CatalogError> {
    let mut fired = Vec::new();
    for template in catalog.stage_templates_for_plant(plant_id)? {
        let step = overrides.get(selection, plant_id, &template.id);
        let enabled = step.is_some_and(|s| s.enabled);
        if !enabled && !template.is_required {
            continue;
        }

        let Some(stage_type) = catalog.stage_type(&template.stage_type_id)? else {
            debug!(
                "skipping stage '{}' of plant '{}': unknown stage type '{}'",
                template.id, plant_id, template.stage_type_id
            );
            continue;
        };

        let duration = step.map_or(template.default_duration, |s| s.duration);
        fired.push(FiredStage {
            template,
            stage_type,
            duration,
        });
    }
    Ok(fired)
}

/// `"{plant} ({variety})"` when the variety resolves, otherwise the plant name.
pub(crate) fn display_name<C: Catalog + ?Sized>(
    catalog: &C,
    plant: &Plant,
    variety_id: Option<&str>,
) -> Result<String, CatalogError> {
    let variety = match variety_id {
        Some(id) => catalog.variety(id)?,
        None => None,
    };
    Ok(match variety {
        Some(v) => format!("{} ({})", plant.name, v.name),
        None => plant.name.clone(),
    })
}

// ---------------------------------------------------------------------------
// Event generation
// ---------------------------------------------------------------------------

/// Derive the cultivation calendar for `request`.
///
/// Stages chain: each event is dated from the previous event of the same
/// plant, so the climate and culture offsets accumulate along a plant's
/// timeline. The result is sorted by date; ties keep emission order.
///
/// An unknown configuration or garden yields an empty calendar. Unknown
/// plants and stage types are skipped. A start date is only parsed when the
/// selection has at least one firing stage.
pub fn generate_events<C: Catalog + ?Sized>(
    catalog: &C,
    request: &GenerateRequest,
) -> Result<Vec<GeneratedEvent>, GenerateError> {
    let Some(config) = catalog.configuration(&request.configuration_id)? else {
        debug!("unknown configuration '{}'", request.configuration_id);
        return Ok(Vec::new());
    };
    if catalog.garden(&request.garden_id)?.is_none() {
        debug!("unknown garden '{}'", request.garden_id);
        return Ok(Vec::new());
    }

    let overrides = StepOverrides::from_request(catalog, request)?;
    let shift = climate_offset(&config.parameters.climate)
        .saturating_add(config.parameters.culture_offset);

    let mut events: Vec<GeneratedEvent> = Vec::new();

    for (index, selection) in request.plants.iter().enumerate() {
        let Some(plant) = catalog.plant(&selection.plant_id)? else {
            warn!("skipping unknown plant '{}'", selection.plant_id);
            continue;
        };
        let stages = fired_stages(catalog, index, &plant.id, &overrides)?;
        if stages.is_empty() {
            continue;
        }
        let plant_name = display_name(catalog, &plant, selection.variety_id.as_deref())?;

        // Only parsed once a stage needs a date.
        let mut cursor =
            parse_start_date(&selection.start_date).ok_or_else(|| GenerateError::DateParse {
                selection: index,
                plant_id: plant.id.clone(),
                value: selection.start_date.clone(),
            })?;

        for stage in stages {
            let adjusted = stage.duration.saturating_add(shift);
            cursor = TimeDelta::try_days(adjusted)
                .and_then(|delta| cursor.checked_add_signed(delta))
                .ok_or_else(|| GenerateError::DateOutOfRange {
                    plant_id: plant.id.clone(),
                    stage_id: stage.template.id.clone(),
                })?;

            events.push(GeneratedEvent {
                title: format!("{} - {}", stage.stage_type.name, plant_name),
                description: format!(
                    "{} pour {} plant(s)",
                    stage.stage_type.description, selection.quantity
                ),
                date: cursor,
                plant_name: plant_name.clone(),
                event_type: stage.stage_type.code,
                status: EventStatus::Pending,
            });
        }
    }

    // sort_by_key is stable
    events.sort_by_key(|e| e.date);
    Ok(events)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use crate::model::{Configuration, ConfigurationParameters, StageOverride, StartMethod};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn make_selection(plant_id: &str, start_date: &str) -> PlantSelection {
        PlantSelection {
            plant_id: plant_id.to_string(),
            variety_id: None,
            quantity: 3,
            start_point: StartMethod::DirectSowing,
            start_date: start_date.to_string(),
        }
    }

    fn step(enabled: bool, duration: i64) -> StepOverride {
        StepOverride { enabled, duration }
    }

    fn tomato_steps(prune: bool) -> Vec<StepOverride> {
        vec![step(true, 14), step(true, 7), step(true, 90), step(prune, 30)]
    }

    fn make_request(plants: Vec<PlantSelection>, steps: Vec<StepOverride>) -> GenerateRequest {
        GenerateRequest {
            configuration_id: "1".to_string(),
            garden_id: "1".to_string(),
            zone_id: "1".to_string(),
            plants,
            cultivation_steps: steps,
            stage_overrides: vec![],
        }
    }

    fn add_config(catalog: &mut InMemoryCatalog, id: &str, climate: &str, culture_offset: i64) {
        catalog.configurations.push(Configuration {
            id: id.to_string(),
            user_id: "tester".to_string(),
            name: id.to_string(),
            parameters: ConfigurationParameters {
                climate: climate.to_string(),
                preferred_days: vec![],
                culture_offset,
            },
        });
    }

    fn catalog_with_config(id: &str, climate: &str, culture_offset: i64) -> InMemoryCatalog {
        let mut catalog = InMemoryCatalog::seeded();
        add_config(&mut catalog, id, climate, culture_offset);
        catalog
    }

    #[test]
    fn test_tomato_scenario() {
        let catalog = InMemoryCatalog::seeded();
        let request = make_request(
            vec![make_selection("tomato", "2024-03-01")],
            tomato_steps(false),
        );
        let events = generate_events(&catalog, &request).unwrap();

        assert_eq!(events.len(), 3);
        assert_eq!(events[0].date, date("2024-03-19"));
        assert_eq!(events[1].date, date("2024-03-30"));
        assert_eq!(events[2].date, date("2024-07-02"));

        assert_eq!(events[0].title, "Semis - Tomate");
        assert_eq!(events[0].description, "Semer les graines pour 3 plant(s)");
        assert_eq!(events[0].event_type, "SOWING");
        assert_eq!(events[1].event_type, "TRANSPLANTING");
        assert_eq!(events[2].event_type, "HARVESTING");
        assert!(events.iter().all(|e| e.status == EventStatus::Pending));
        assert!(events.iter().all(|e| e.plant_name == "Tomate"));
    }

    #[test]
    fn test_optional_stage_fires_only_when_enabled() {
        let catalog = InMemoryCatalog::seeded();
        let request = make_request(
            vec![make_selection("tomato", "2024-03-01")],
            tomato_steps(true),
        );
        let events = generate_events(&catalog, &request).unwrap();
        assert_eq!(events.len(), 4);
        let pruning = events.iter().find(|e| e.event_type == "PRUNING").unwrap();
        // 2024-07-02 + 30 + 4
        assert_eq!(pruning.date, date("2024-08-05"));
    }

    #[test]
    fn test_required_stages_ignore_disabled_overrides() {
        let catalog = InMemoryCatalog::seeded();
        let request = make_request(
            vec![make_selection("tomato", "2024-03-01")],
            vec![step(false, 14), step(false, 7), step(false, 90), step(false, 30)],
        );
        let events = generate_events(&catalog, &request).unwrap();
        let types: Vec<&str> = events.iter().map(|e| e.event_type.as_str()).collect();
        assert_eq!(types, vec!["SOWING", "TRANSPLANTING", "HARVESTING"]);
    }

    #[test]
    fn test_required_stage_without_override_uses_default_duration() {
        let catalog = InMemoryCatalog::seeded();
        let request = make_request(vec![make_selection("tomato", "2024-03-01")], vec![]);
        let events = generate_events(&catalog, &request).unwrap();
        // Defaults equal the scenario overrides, so the dates match.
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].date, date("2024-03-19"));
        assert_eq!(events[2].date, date("2024-07-02"));
    }

    #[test]
    fn test_override_duration_replaces_default() {
        let catalog = InMemoryCatalog::seeded();
        let request = make_request(
            vec![make_selection("tomato", "2024-03-01")],
            vec![step(true, 1), step(true, 1), step(true, 1), step(false, 30)],
        );
        let events = generate_events(&catalog, &request).unwrap();
        assert_eq!(events[0].date, date("2024-03-06"));
        assert_eq!(events[1].date, date("2024-03-11"));
        assert_eq!(events[2].date, date("2024-03-16"));
    }

    #[test]
    fn test_keyed_overrides_take_precedence() {
        let catalog = InMemoryCatalog::seeded();
        let mut request = make_request(
            vec![make_selection("tomato", "2024-03-01")],
            tomato_steps(false),
        );
        request.stage_overrides = vec![StageOverride {
            plant_id: "tomato".to_string(),
            stage_id: "4".to_string(),
            enabled: true,
            duration: 10,
        }];
        let events = generate_events(&catalog, &request).unwrap();
        assert_eq!(events.len(), 4);
        // 2024-07-02 + 10 + 4
        assert_eq!(events[3].date, date("2024-07-16"));
    }

    #[test]
    fn test_unknown_configuration_or_garden_is_empty() {
        let catalog = InMemoryCatalog::seeded();
        let mut request = make_request(
            vec![make_selection("tomato", "2024-03-01")],
            tomato_steps(false),
        );
        request.configuration_id = "missing".to_string();
        assert!(generate_events(&catalog, &request).unwrap().is_empty());

        request.configuration_id = "1".to_string();
        request.garden_id = "missing".to_string();
        assert!(generate_events(&catalog, &request).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_plant_is_skipped() {
        let catalog = InMemoryCatalog::seeded();
        let request = make_request(
            vec![
                make_selection("carrot", "2024-03-01"),
                make_selection("tomato", "2024-03-01"),
            ],
            vec![],
        );
        let events = generate_events(&catalog, &request).unwrap();
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| e.plant_name == "Tomate"));
    }

    #[test]
    fn test_unknown_stage_type_is_skipped_without_advancing() {
        let mut catalog = InMemoryCatalog::seeded();
        catalog.stage_templates[1].stage_type_id = "ghost".to_string();
        let request = make_request(
            vec![make_selection("tomato", "2024-03-01")],
            tomato_steps(false),
        );
        let events = generate_events(&catalog, &request).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].date, date("2024-03-19"));
        // 2024-03-19 + 90 + 4
        assert_eq!(events[1].date, date("2024-06-21"));
    }

    #[test]
    fn test_variety_is_appended_to_plant_name() {
        let catalog = InMemoryCatalog::seeded();
        let mut selection = make_selection("tomato", "2024-03-01");
        selection.variety_id = Some("2".to_string());
        let events =
            generate_events(&catalog, &make_request(vec![selection], vec![])).unwrap();
        assert_eq!(events[0].plant_name, "Tomate (Roma)");
        assert_eq!(events[0].title, "Semis - Tomate (Roma)");
    }

    #[test]
    fn test_unresolved_variety_keeps_plain_name() {
        let catalog = InMemoryCatalog::seeded();
        let mut selection = make_selection("tomato", "2024-03-01");
        selection.variety_id = Some("404".to_string());
        let events =
            generate_events(&catalog, &make_request(vec![selection], vec![])).unwrap();
        assert_eq!(events[0].plant_name, "Tomate");
    }

    #[test]
    fn test_climate_offsets_compound_per_stage() {
        let mut catalog = catalog_with_config("cold", "usda-zone-3", 0);
        add_config(&mut catalog, "warm", "usda-zone-9", 0);

        let mut request = make_request(
            vec![make_selection("tomato", "2024-03-01")],
            tomato_steps(false),
        );
        request.configuration_id = "cold".to_string();
        let cold = generate_events(&catalog, &request).unwrap();
        request.configuration_id = "warm".to_string();
        let warm = generate_events(&catalog, &request).unwrap();

        assert_eq!(cold.len(), warm.len());
        for (n, (c, w)) in cold.iter().zip(&warm).enumerate() {
            assert_eq!((w.date - c.date).num_days(), 13 * (n as i64 + 1));
        }
    }

    #[test]
    fn test_unknown_climate_and_culture_offset() {
        let catalog = catalog_with_config("odd", "martian-plains", -2);
        let mut request = make_request(
            vec![make_selection("tomato", "2024-03-01")],
            tomato_steps(false),
        );
        request.configuration_id = "odd".to_string();
        let events = generate_events(&catalog, &request).unwrap();
        // 14 + 0 - 2
        assert_eq!(events[0].date, date("2024-03-13"));
        // + 7 + 0 - 2
        assert_eq!(events[1].date, date("2024-03-18"));
    }

    #[test]
    fn test_negative_adjustment_moves_backwards() {
        let catalog = catalog_with_config("early", "usda-zone-3", -10);
        let mut request = make_request(
            vec![make_selection("tomato", "2024-03-01")],
            vec![step(true, 1), step(true, 1), step(true, 1), step(false, 1)],
        );
        request.configuration_id = "early".to_string();
        let events = generate_events(&catalog, &request).unwrap();
        // each stage: 1 - 7 - 10 = -16 days, so the sort reverses emission order
        assert_eq!(events[0].date, date("2024-01-13"));
        assert_eq!(events[0].event_type, "HARVESTING");
        assert_eq!(events[1].date, date("2024-01-29"));
        assert_eq!(events[2].date, date("2024-02-14"));
        assert_eq!(events[2].event_type, "SOWING");
    }

    #[test]
    fn test_events_sorted_across_plants_with_stable_ties() {
        let mut catalog = InMemoryCatalog::seeded();
        catalog.plants.push(Plant {
            id: "lettuce".to_string(),
            name: "Laitue".to_string(),
            cultivation_stages: vec![],
            scientific_name: None,
            description: None,
            image_url: None,
        });
        catalog.stage_templates.push(StageTemplate {
            id: "L1".to_string(),
            plant_id: "lettuce".to_string(),
            stage_type_id: "1".to_string(),
            name: "Semis".to_string(),
            default_duration: 5,
            is_required: true,
        });
        catalog.stage_templates.push(StageTemplate {
            id: "L2".to_string(),
            plant_id: "lettuce".to_string(),
            stage_type_id: "3".to_string(),
            name: "Récolte".to_string(),
            default_duration: 30,
            is_required: true,
        });

        let request = make_request(
            vec![
                make_selection("tomato", "2024-03-01"),
                make_selection("lettuce", "2024-03-10"),
            ],
            vec![],
        );
        let events = generate_events(&catalog, &request).unwrap();
        let got: Vec<(String, String)> = events
            .iter()
            .map(|e| (e.date.to_string(), e.plant_name.clone()))
            .collect();
        assert_eq!(
            got,
            vec![
                ("2024-03-19".to_string(), "Tomate".to_string()),
                ("2024-03-19".to_string(), "Laitue".to_string()),
                ("2024-03-30".to_string(), "Tomate".to_string()),
                ("2024-04-22".to_string(), "Laitue".to_string()),
                ("2024-07-02".to_string(), "Tomate".to_string()),
            ]
        );
        assert!(events.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[test]
    fn test_generation_is_idempotent() {
        let catalog = InMemoryCatalog::seeded();
        let request = make_request(
            vec![
                make_selection("tomato", "2024-03-01"),
                make_selection("basil", "2024-04-01"),
            ],
            tomato_steps(true),
        );
        let first = generate_events(&catalog, &request).unwrap();
        let second = generate_events(&catalog, &request).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_malformed_start_date_is_an_error() {
        let catalog = InMemoryCatalog::seeded();
        let request = make_request(vec![make_selection("tomato", "")], tomato_steps(false));
        let err = generate_events(&catalog, &request).unwrap_err();
        match err {
            GenerateError::DateParse {
                selection,
                plant_id,
                value,
            } => {
                assert_eq!(selection, 0);
                assert_eq!(plant_id, "tomato");
                assert_eq!(value, "");
            }
            other => panic!("unexpected error: {other}"),
        }

        let request = make_request(
            vec![make_selection("tomato", "2024-02-30")],
            tomato_steps(false),
        );
        assert!(matches!(
            generate_events(&catalog, &request),
            Err(GenerateError::DateParse { .. })
        ));
    }

    #[test]
    fn test_out_of_range_date_is_an_error() {
        let catalog = InMemoryCatalog::seeded();
        let request = make_request(
            vec![make_selection("tomato", "2024-03-01")],
            vec![step(true, 1_000_000_000), step(true, 7), step(true, 90), step(false, 30)],
        );
        let err = generate_events(&catalog, &request).unwrap_err();
        match err {
            GenerateError::DateOutOfRange { plant_id, stage_id } => {
                assert_eq!(plant_id, "tomato");
                assert_eq!(stage_id, "1");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_start_date_forms() {
        assert_eq!(parse_start_date("2024-03-01"), Some(date("2024-03-01")));
        assert_eq!(parse_start_date(" 2024-03-01 "), Some(date("2024-03-01")));
        assert_eq!(
            parse_start_date("2024-03-01T00:00:00.000Z"),
            Some(date("2024-03-01"))
        );
        assert_eq!(
            parse_start_date("2024-03-01T23:30:00+02:00"),
            Some(date("2024-03-01"))
        );
        assert_eq!(parse_start_date("2024-03-01T08:15"), Some(date("2024-03-01")));
        assert_eq!(parse_start_date("01/03/2024"), None);
        assert_eq!(parse_start_date("not a date"), None);
    }

    #[test]
    fn test_from_flattened_uses_plant_stride() {
        let catalog = InMemoryCatalog::seeded();
        let plants = vec![
            make_selection("basil", "2024-03-01"),
            make_selection("tomato", "2024-03-01"),
        ];
        let steps: Vec<StepOverride> = (0..8).map(|i| step(i % 2 == 0, i)).collect();
        let overrides = StepOverrides::from_flattened(&catalog, &plants, &steps).unwrap();

        // Tomato sits at plant index 1 with four stages: indices 4..8.
        assert_eq!(overrides.get(1, "tomato", "1"), Some(&step(true, 4)));
        assert_eq!(overrides.get(1, "tomato", "2"), Some(&step(false, 5)));
        assert_eq!(overrides.get(1, "tomato", "3"), Some(&step(true, 6)));
        assert_eq!(overrides.get(1, "tomato", "4"), Some(&step(false, 7)));
        assert!(overrides.get(0, "basil", "1").is_none());
        assert!(overrides.get(0, "tomato", "1").is_none());
    }

    #[test]
    fn test_from_flattened_tolerates_short_arrays() {
        let catalog = InMemoryCatalog::seeded();
        let plants = vec![make_selection("tomato", "2024-03-01")];
        let overrides =
            StepOverrides::from_flattened(&catalog, &plants, &[step(true, 3)]).unwrap();
        assert_eq!(overrides.get(0, "tomato", "1"), Some(&step(true, 3)));
        assert!(overrides.get(0, "tomato", "2").is_none());
    }

    #[test]
    fn test_repeated_plant_keeps_its_own_block() {
        let catalog = InMemoryCatalog::seeded();
        let mut steps = tomato_steps(false);
        steps.extend([step(true, 1), step(true, 1), step(true, 1), step(true, 1)]);
        let request = make_request(
            vec![
                make_selection("tomato", "2024-03-01"),
                make_selection("tomato", "2024-05-01"),
            ],
            steps,
        );
        let events = generate_events(&catalog, &request).unwrap();

        let got: Vec<(String, &str)> = events
            .iter()
            .map(|e| (e.date.to_string(), e.event_type.as_str()))
            .collect();
        assert_eq!(
            got,
            vec![
                ("2024-03-19".to_string(), "SOWING"),
                ("2024-03-30".to_string(), "TRANSPLANTING"),
                // second planting: 1 + 4 days per stage
                ("2024-05-06".to_string(), "SOWING"),
                ("2024-05-11".to_string(), "TRANSPLANTING"),
                ("2024-05-16".to_string(), "HARVESTING"),
                ("2024-05-21".to_string(), "PRUNING"),
                ("2024-07-02".to_string(), "HARVESTING"),
            ]
        );
    }

    #[test]
    fn test_keyed_override_applies_to_every_selection() {
        let catalog = InMemoryCatalog::seeded();
        let mut request = make_request(
            vec![
                make_selection("tomato", "2024-03-01"),
                make_selection("tomato", "2024-05-01"),
            ],
            vec![],
        );
        request.stage_overrides = vec![StageOverride {
            plant_id: "tomato".to_string(),
            stage_id: "4".to_string(),
            enabled: true,
            duration: 10,
        }];
        let events = generate_events(&catalog, &request).unwrap();
        assert_eq!(events.iter().filter(|e| e.event_type == "PRUNING").count(), 2);
    }

    #[test]
    fn test_start_date_ignored_without_firing_stages() {
        let catalog = InMemoryCatalog::seeded();
        // potato has no stage templates
        let request = make_request(
            vec![
                make_selection("potato", "not a date"),
                make_selection("tomato", "2024-03-01"),
            ],
            vec![],
        );
        let events = generate_events(&catalog, &request).unwrap();
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn test_date_error_names_the_selection() {
        let catalog = InMemoryCatalog::seeded();
        let request = make_request(
            vec![
                make_selection("tomato", "2024-03-01"),
                make_selection("tomato", "2024-13-01"),
            ],
            vec![],
        );
        match generate_events(&catalog, &request).unwrap_err() {
            GenerateError::DateParse { selection, .. } => assert_eq!(selection, 1),
            other => panic!("unexpected error: {other}"),
        }
    }
}
