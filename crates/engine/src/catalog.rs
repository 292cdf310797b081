use serde::{Deserialize, Serialize};

use crate::model::{
    Configuration, ConfigurationParameters, Garden, GardenZone, Plant, StageKind, StageTemplate,
    StageType, Variety,
};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
    #[error("Corrupt {entity} '{id}': {reason}")]
    Corrupt {
        entity: &'static str,
        id: String,
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Repository interface
// ---------------------------------------------------------------------------

/// Read-only access to the reference data the generator and validator need.
///
/// Lookups return `Ok(None)` for an unknown ID; `Err` is reserved for a
/// backing store that could not answer at all.
pub trait Catalog {
    fn plant(&self, id: &str) -> Result<Option<Plant>, CatalogError>;

    fn variety(&self, id: &str) -> Result<Option<Variety>, CatalogError>;

    fn varieties_for_plant(&self, plant_id: &str) -> Result<Vec<Variety>, CatalogError>;

    fn stage_type(&self, id: &str) -> Result<Option<StageType>, CatalogError>;

    /// Stage templates owned by `plant_id`, in cultivation order.
    fn stage_templates_for_plant(&self, plant_id: &str)
        -> Result<Vec<StageTemplate>, CatalogError>;

    fn configuration(&self, id: &str) -> Result<Option<Configuration>, CatalogError>;

    fn garden(&self, id: &str) -> Result<Option<Garden>, CatalogError>;

    fn zone(&self, id: &str) -> Result<Option<GardenZone>, CatalogError>;

    fn zones_for_garden(&self, garden_id: &str) -> Result<Vec<GardenZone>, CatalogError>;
}

// ---------------------------------------------------------------------------
// In-memory implementation
// ---------------------------------------------------------------------------

/// Catalog backed by plain vectors. Declaration order of `stage_templates`
/// is the cultivation order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InMemoryCatalog {
    #[serde(default)]
    pub plants: Vec<Plant>,
    #[serde(default)]
    pub varieties: Vec<Variety>,
    #[serde(default)]
    pub stage_types: Vec<StageType>,
    #[serde(default)]
    pub stage_templates: Vec<StageTemplate>,
    #[serde(default)]
    pub configurations: Vec<Configuration>,
    #[serde(default)]
    pub gardens: Vec<Garden>,
    #[serde(default)]
    pub zones: Vec<GardenZone>,
}

fn find_by_id<T: Clone>(items: &[T], id: &str, key: impl Fn(&T) -> &str) -> Option<T> {
    items.iter().find(|item| key(item) == id).cloned()
}

impl Catalog for InMemoryCatalog {
    fn plant(&self, id: &str) -> Result<Option<Plant>, CatalogError> {
        Ok(find_by_id(&self.plants, id, |p| p.id.as_str()))
    }

    fn variety(&self, id: &str) -> Result<Option<Variety>, CatalogError> {
        Ok(find_by_id(&self.varieties, id, |v| v.id.as_str()))
    }

    fn varieties_for_plant(&self, plant_id: &str) -> Result<Vec<Variety>, CatalogError> {
        Ok(self
            .varieties
            .iter()
            .filter(|v| v.plant_id == plant_id)
            .cloned()
            .collect())
    }

    fn stage_type(&self, id: &str) -> Result<Option<StageType>, CatalogError> {
        Ok(find_by_id(&self.stage_types, id, |t| t.id.as_str()))
    }

    fn stage_templates_for_plant(
        &self,
        plant_id: &str,
    ) -> Result<Vec<StageTemplate>, CatalogError> {
        Ok(self
            .stage_templates
            .iter()
            .filter(|t| t.plant_id == plant_id)
            .cloned()
            .collect())
    }

    fn configuration(&self, id: &str) -> Result<Option<Configuration>, CatalogError> {
        Ok(find_by_id(&self.configurations, id, |c| c.id.as_str()))
    }

    fn garden(&self, id: &str) -> Result<Option<Garden>, CatalogError> {
        Ok(find_by_id(&self.gardens, id, |g| g.id.as_str()))
    }

    fn zone(&self, id: &str) -> Result<Option<GardenZone>, CatalogError> {
        Ok(find_by_id(&self.zones, id, |z| z.id.as_str()))
    }

    fn zones_for_garden(&self, garden_id: &str) -> Result<Vec<GardenZone>, CatalogError> {
        Ok(self
            .zones
            .iter()
            .filter(|z| z.garden_id == garden_id)
            .cloned()
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Seeded reference data
// ---------------------------------------------------------------------------

fn plant(id: &str, name: &str, stages: &[StageKind], description: &str) -> Plant {
    Plant {
        id: id.to_string(),
        name: name.to_string(),
        cultivation_stages: stages.to_vec(),
        scientific_name: None,
        description: Some(description.to_string()),
        image_url: Some(format!("/plants/{}.svg", id)),
    }
}

fn variety(id: &str, plant_id: &str, name: &str) -> Variety {
    Variety {
        id: id.to_string(),
        plant_id: plant_id.to_string(),
        name: name.to_string(),
    }
}

fn stage_type(id: &str, name: &str, code: &str, description: &str) -> StageType {
    StageType {
        id: id.to_string(),
        name: name.to_string(),
        code: code.to_string(),
        description: description.to_string(),
    }
}

fn template(
    id: &str,
    plant_id: &str,
    stage_type_id: &str,
    name: &str,
    default_duration: i64,
    is_required: bool,
) -> StageTemplate {
    StageTemplate {
        id: id.to_string(),
        plant_id: plant_id.to_string(),
        stage_type_id: stage_type_id.to_string(),
        name: name.to_string(),
        default_duration,
        is_required,
    }
}

fn configuration(id: &str, name: &str, days: &[&str], climate: &str, offset: i64) -> Configuration {
    Configuration {
        id: id.to_string(),
        user_id: "user1".to_string(),
        name: name.to_string(),
        parameters: ConfigurationParameters {
            climate: climate.to_string(),
            preferred_days: days.iter().map(|d| d.to_string()).collect(),
            culture_offset: offset,
        },
    }
}

impl InMemoryCatalog {
    /// The reference data shipped with the planner.
    ///
    /// Carrot stage templates and varieties are present without a carrot
    /// plant entry; generation for "carrot" is therefore a per-plant skip.
    pub fn seeded() -> Self {
        use StageKind::{Seed, Seedling, Transplant};

        InMemoryCatalog {
            plants: vec![
                plant(
                    "tomato",
                    "Tomate",
                    &[Seed, Seedling, Transplant],
                    "Plante potagère très populaire, idéale pour les débutants",
                ),
                plant(
                    "potato",
                    "Pomme de terre",
                    &[Seed, Seedling, Transplant],
                    "Légume commun utilisé pour la cuisine",
                ),
                plant(
                    "spinach",
                    "Épinard",
                    &[Seed, Transplant],
                    "Légume feuille riche en fer et en vitamines",
                ),
                plant(
                    "basil",
                    "Basilic",
                    &[Seed, Seedling],
                    "Herbe aromatique méditerranéenne parfaite pour la cuisine",
                ),
                plant(
                    "zucchini",
                    "Courgette",
                    &[Seed, Transplant],
                    "Plante productive de la famille des courges",
                ),
                plant(
                    "peas",
                    "Petits Pois",
                    &[Seed],
                    "Légumineuse grimpante facile à cultiver",
                ),
            ],
            varieties: vec![
                variety("1", "tomato", "Coeur de Boeuf"),
                variety("2", "tomato", "Roma"),
                variety("3", "tomato", "Cerise"),
                variety("4", "carrot", "Nantaise"),
                variety("5", "spinach", "Géant d'Hiver"),
                variety("6", "spinach", "Matador"),
                variety("7", "basil", "Grand Vert"),
                variety("8", "basil", "Pourpre"),
                variety("9", "zucchini", "Black Beauty"),
                variety("10", "zucchini", "Cocozelle"),
                variety("11", "peas", "Merveille de Kelvedon"),
                variety("12", "peas", "Petit Provençal"),
            ],
            stage_types: vec![
                stage_type("1", "Semis", "SOWING", "Semer les graines"),
                stage_type("2", "Repiquage", "TRANSPLANTING", "Repiquer les plants"),
                stage_type("3", "Récolte", "HARVESTING", "Récolter les fruits/légumes"),
                stage_type("4", "Taille", "PRUNING", "Tailler les plants"),
            ],
            stage_templates: vec![
                template("1", "tomato", "1", "Semis", 14, true),
                template("2", "tomato", "2", "Repiquage", 7, true),
                template("3", "tomato", "3", "Récolte", 90, true),
                template("4", "tomato", "4", "Taille", 30, false),
                template("5", "carrot", "1", "Semis", 10, true),
                template("6", "carrot", "3", "Récolte", 70, true),
            ],
            configurations: vec![
                configuration(
                    "1",
                    "Configuration par défaut",
                    &["MONDAY", "WEDNESDAY", "SATURDAY"],
                    "usda-zone-8",
                    0,
                ),
                configuration(
                    "2",
                    "Configuration été",
                    &["SATURDAY", "SUNDAY"],
                    "usda-zone-8",
                    -7,
                ),
            ],
            gardens: vec![
                Garden {
                    id: "1".to_string(),
                    name: "Mon Potager Principal".to_string(),
                    description: Some("Potager en pleine terre".to_string()),
                    climate_zone: Some("usda-zone-8".to_string()),
                    soil_types: vec!["loam".to_string()],
                    area: 100.0,
                },
                Garden {
                    id: "2".to_string(),
                    name: "Jardin de Terrasse".to_string(),
                    description: Some("Culture en pots sur la terrasse".to_string()),
                    climate_zone: Some("usda-zone-8".to_string()),
                    soil_types: vec!["clay".to_string()],
                    area: 50.0,
                },
            ],
            zones: vec![
                GardenZone {
                    id: "1".to_string(),
                    garden_id: "1".to_string(),
                    name: "Zone Ensoleillée".to_string(),
                    description: Some("Zone bien exposée au soleil".to_string()),
                },
                GardenZone {
                    id: "2".to_string(),
                    garden_id: "1".to_string(),
                    name: "Zone Mi-Ombre".to_string(),
                    description: Some("Zone partiellement ombragée".to_string()),
                },
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_templates_keep_declaration_order() {
        let catalog = InMemoryCatalog::seeded();
        let ids: Vec<String> = catalog
            .stage_templates_for_plant("tomato")
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_unknown_ids_resolve_to_none() {
        let catalog = InMemoryCatalog::seeded();
        assert!(catalog.plant("cactus").unwrap().is_none());
        assert!(catalog.configuration("99").unwrap().is_none());
        assert!(catalog.stage_templates_for_plant("cactus").unwrap().is_empty());
    }

    #[test]
    fn test_zones_and_varieties_filter_by_owner() {
        let catalog = InMemoryCatalog::seeded();
        assert_eq!(catalog.zones_for_garden("1").unwrap().len(), 2);
        assert!(catalog.zones_for_garden("2").unwrap().is_empty());

        let names: Vec<String> = catalog
            .varieties_for_plant("basil")
            .unwrap()
            .into_iter()
            .map(|v| v.name)
            .collect();
        assert_eq!(names, vec!["Grand Vert", "Pourpre"]);
    }

    #[test]
    fn test_catalog_deserializes_with_missing_collections() {
        let json = r#"{ "plants": [ { "id": "mint", "name": "Menthe" } ] }"#;
        let catalog: InMemoryCatalog = serde_json::from_str(json).unwrap();
        assert_eq!(catalog.plants.len(), 1);
        assert!(catalog.plants[0].cultivation_stages.is_empty());
        assert!(catalog.stage_templates.is_empty());
        assert!(catalog.gardens.is_empty());
    }
}
