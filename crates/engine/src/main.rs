use std::io::{self, Read, Write};

use log::debug;
use serde::{Deserialize, Serialize};

use garden_planner_engine::catalog::InMemoryCatalog;
use garden_planner_engine::model::{GenerateRequest, PlantStartPoint};
use garden_planner_engine::{generator, summary, validator};

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Every command may carry its own `catalog`; without one the seeded
/// reference data is used.
#[derive(Debug, Deserialize)]
#[serde(
    tag = "command",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
enum Request {
    Generate {
        catalog: Option<InMemoryCatalog>,
        request: GenerateRequest,
    },
    Summarize {
        catalog: Option<InMemoryCatalog>,
        request: GenerateRequest,
    },
    Validate {
        catalog: Option<InMemoryCatalog>,
        request: GenerateRequest,
    },
    ValidateCatalog {
        catalog: Option<InMemoryCatalog>,
    },
    ZoneBelongsToGarden {
        catalog: Option<InMemoryCatalog>,
        garden_id: String,
        zone_id: String,
    },
    ConfigurationCompatible {
        catalog: Option<InMemoryCatalog>,
        configuration_id: String,
        plants: Vec<PlantStartPoint>,
    },
    /// Echo the catalog in effect.
    Catalog {
        catalog: Option<InMemoryCatalog>,
    },
}

#[derive(Debug, Serialize)]
struct OkResponse<T: Serialize> {
    ok: bool,
    data: T,
}

#[derive(Debug, Serialize)]
struct ErrResponse {
    ok: bool,
    error: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn resolve_catalog(catalog: Option<InMemoryCatalog>) -> InMemoryCatalog {
    catalog.unwrap_or_else(InMemoryCatalog::seeded)
}

fn write_ok<T: Serialize>(data: T) {
    let resp = OkResponse { ok: true, data };
    let json = serde_json::to_string(&resp).unwrap_or_else(|e| {
        format!("{{\"ok\":false,\"error\":\"serialization error: {}\"}}", e)
    });
    println!("{}", json);
    let _ = io::stdout().flush();
}

fn write_err(msg: impl std::fmt::Display) -> ! {
    let resp = ErrResponse {
        ok: false,
        error: msg.to_string(),
    };
    let json = serde_json::to_string(&resp).unwrap_or_else(|_| {
        "{\"ok\":false,\"error\":\"double serialization error\"}".to_string()
    });
    println!("{}", json);
    let _ = io::stdout().flush();
    std::process::exit(1);
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    // Logs go to stderr so stdout stays a single JSON document.
    env_logger::init();

    let mut input = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut input) {
        write_err(format!("Failed to read stdin: {}", e));
    }

    let request: Request = match serde_json::from_str(&input) {
        Ok(r) => r,
        Err(e) => write_err(format!("Invalid JSON input: {}", e)),
    };
    debug!("received {:?}", request);

    match request {
        Request::Generate { catalog, request } => {
            let catalog = resolve_catalog(catalog);
            match generator::generate_events(&catalog, &request) {
                Ok(events) => write_ok(events),
                Err(e) => write_err(e),
            }
        }
        Request::Summarize { catalog, request } => {
            let catalog = resolve_catalog(catalog);
            match summary::summarize(&catalog, &request) {
                Ok(summary) => write_ok(summary),
                Err(e) => write_err(e),
            }
        }
        Request::Validate { catalog, request } => {
            let catalog = resolve_catalog(catalog);
            write_ok(validator::validate_request(&catalog, &request));
        }
        Request::ValidateCatalog { catalog } => {
            let catalog = resolve_catalog(catalog);
            write_ok(validator::validate_catalog(&catalog));
        }
        Request::ZoneBelongsToGarden {
            catalog,
            garden_id,
            zone_id,
        } => {
            let catalog = resolve_catalog(catalog);
            write_ok(validator::zone_belongs_to_garden(
                &catalog, &garden_id, &zone_id,
            ));
        }
        Request::ConfigurationCompatible {
            catalog,
            configuration_id,
            plants,
        } => {
            let catalog = resolve_catalog(catalog);
            write_ok(validator::configuration_compatible_with_plants(
                &catalog,
                &configuration_id,
                &plants,
            ));
        }
        Request::Catalog { catalog } => {
            write_ok(resolve_catalog(catalog));
        }
    }
}
