use serde::{Deserialize, Serialize};

use crate::domain::SurveyRecord;

/// `result` value the backend reports for an accepted submission.
pub const RESULT_SUCCESS: &str = "success";

/// Body of `POST <endpoint>`. Blank optional fields travel as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitSurveyRequest {
    pub survey_url: String,
    pub target_group: String,
    pub bypass_link: String,
    pub additional_details: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub result: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SubmitResponse {
    pub fn is_success(&self) -> bool {
        self.result == RESULT_SUCCESS
    }
}

/// Query string of `GET <endpoint>?url=...`.
#[derive(Debug, Clone, Serialize)]
pub struct LookupQuery<'a> {
    pub url: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResponse {
    pub found: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<SurveyRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LookupResponse {
    /// Records in backend order; a `found` response without records is treated
    /// as empty.
    pub fn into_records(self) -> Vec<SurveyRecord> {
        if !self.found {
            return Vec::new();
        }
        self.results.unwrap_or_default()
    }
}
