use serde::{Deserialize, Serialize};

use super::{repo_types::CropRecord, services::Advice};
use crate::weather::dto::WeatherSnapshot;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCropRequest {
    pub soil_type: Option<String>,
    pub season: Option<String>,
    pub location: Option<String>,
}

/// A crop record with the request's weather and advice attached.
#[derive(Debug, Serialize)]
pub struct CropAdvisory {
    #[serde(flatten)]
    pub crop: CropRecord,
    pub weather: Option<WeatherSnapshot>,
    pub advice: Advice,
}
