//! Recipe domain models: recipe types and recipe runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::job::{Job, JobData, JobEvent};

/// A registered recipe type (a DAG of job types).
///
/// The definition block is the raw DAG document; this client passes it
/// through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RecipeType {
    pub id: Option<i64>,
    pub name: String,
    pub version: String,
    pub title: String,
    pub description: String,
    pub is_active: bool,
    pub definition: Value,
    pub revision_num: i64,
    pub created: Option<DateTime<Utc>>,
    pub last_modified: Option<DateTime<Utc>>,
    pub archived: Option<DateTime<Utc>>,
}

impl RecipeType {
    /// `name` and `version` together identify a recipe type.
    pub fn key(&self) -> String {
        format!("{} {}", self.name, self.version)
    }

    /// Names of the jobs the definition wires together.
    pub fn job_names(&self) -> Vec<String> {
        self.definition
            .get("jobs")
            .and_then(Value::as_array)
            .map(|jobs| {
                jobs.iter()
                    .filter_map(|job| job.get("name"))
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// One recipe run as listed by the recipes grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Recipe {
    pub id: Option<i64>,
    pub recipe_type: RecipeType,
    pub recipe_type_rev: i64,
    pub event: JobEvent,
    pub created: Option<DateTime<Utc>>,
    pub completed: Option<DateTime<Utc>>,
    pub last_modified: Option<DateTime<Utc>>,
}

impl Recipe {
    pub fn is_completed(&self) -> bool {
        self.completed.is_some()
    }
}

/// A job slot inside a recipe run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RecipeJob {
    pub job: Job,
    pub job_name: String,
    pub is_original: bool,
    /// Id of the recipe run this slot belongs to.
    pub recipe: Option<i64>,
}

/// Full recipe record from the recipe details endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RecipeDetails {
    pub id: Option<i64>,
    pub recipe_type: RecipeType,
    pub recipe_type_rev: i64,
    pub event: JobEvent,
    pub data: JobData,
    pub jobs: Vec<RecipeJob>,
    pub created: Option<DateTime<Utc>>,
    pub completed: Option<DateTime<Utc>>,
    pub last_modified: Option<DateTime<Utc>>,
}

impl RecipeDetails {
    /// Find one of the recipe's jobs by its slot name.
    pub fn job_by_name(&self, name: &str) -> Option<&RecipeJob> {
        self.jobs.iter().find(|slot| slot.job_name == name)
    }

    /// Whether every job in the recipe reached a terminal status.
    pub fn all_jobs_terminal(&self) -> bool {
        self.jobs.iter().all(|slot| slot.job.status.is_terminal())
    }
}
