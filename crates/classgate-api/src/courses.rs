//! Course catalog records

use classgate_util::CourseId;
use serde::{Deserialize, Serialize};

/// A course as listed in the catalog or in the student's enrollments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRecord {
    #[serde(rename = "_id", alias = "id")]
    pub id: CourseId,

    #[serde(alias = "name")]
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub price: Option<f64>,

    #[serde(default)]
    pub thumbnail: Option<String>,
}
