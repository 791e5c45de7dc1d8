use serde::Deserialize;

use crate::catalog::{CourseCatalog, MockCourseCatalog};
use crate::config::Settings;
use crate::model::Course;
use crate::roster::RosterStore;
use crate::upload::{ImageUploader, MockImageUploader};

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub roster: RosterStore,
    pub catalog: Box<dyn CourseCatalog>,
    pub uploader: Box<dyn ImageUploader>,
    /// Last catalog that loaded successfully. `None` until the first fetch
    /// succeeds.
    pub courses: Option<Vec<Course>>,
}

impl AppState {
    pub fn from_settings(settings: &Settings) -> Self {
        let roster = if settings.seed_students {
            RosterStore::seeded()
        } else {
            RosterStore::new()
        };
        Self {
            roster,
            catalog: Box::new(MockCourseCatalog::new(settings.catalog_latency())),
            uploader: Box::new(MockImageUploader::new(settings.upload_latency())),
            courses: None,
        }
    }
}
