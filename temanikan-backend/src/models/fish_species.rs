use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fishpedia reference record. Only `name` is guaranteed present; every
/// other attribute may be null in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FishSpecies {
    pub id: i64,
    pub name: String,
    pub scientific_name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub care_level: Option<String>,
    pub max_size: Option<String>,
    pub water_temp: Option<String>,
    pub ph_range: Option<String>,
    pub diet: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating or updating a catalog entry.
#[derive(Debug, Clone, Deserialize)]
pub struct FishSpeciesInput {
    pub name: String,
    pub scientific_name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub care_level: Option<String>,
    pub max_size: Option<String>,
    pub water_temp: Option<String>,
    pub ph_range: Option<String>,
    pub diet: Option<String>,
    pub image_url: Option<String>,
}

#[cfg(test)]
impl FishSpecies {
    /// Bare record with only a name, for synthesizer and orchestrator tests.
    pub fn named(name: &str) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
            scientific_name: None,
            category: None,
            description: None,
            care_level: None,
            max_size: None,
            water_temp: None,
            ph_range: None,
            diet: None,
            image_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}
