// src/models/itinerary.rs
use serde::{Deserialize, Serialize};

use crate::models::default_language;

/// Title used when the model's output cannot be parsed as a structured plan.
pub const FALLBACK_TITLE: &str = "Your Jharkhand Adventure";

#[derive(Debug, Deserialize)]
pub struct ItineraryRequest {
    pub preferences: String,
    pub duration: i64,
    pub budget: String,
    pub interests: Vec<String>,
    #[serde(default = "default_language")]
    pub language: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StructuredItinerary {
    pub title: String,
    pub days: Vec<ItineraryDay>,
    #[serde(rename = "totalBudget")]
    pub total_budget: String,
    pub tips: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ItineraryDay {
    pub day: i64,
    pub title: String,
    pub activities: Vec<Activity>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Activity {
    pub time: String,
    pub activity: String,
    pub location: String,
    pub description: String,
    pub cost: String,
    pub tips: String,
}

#[derive(Debug, Serialize)]
pub struct PlainTextItinerary {
    pub title: String,
    pub content: String,
    #[serde(rename = "isPlainText")]
    pub is_plain_text: bool,
}

/// Outcome of parsing the model's reply: either the full structured plan or
/// the plain-text wrapper. Serializes as one shape or the other, never a mix.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Itinerary {
    Structured(StructuredItinerary),
    PlainText(PlainTextItinerary),
}

impl Itinerary {
    /// Strict parse of the model output. Anything short of the complete
    /// structured shape (prose, truncated JSON, a JSON object with missing
    /// fields) degrades to the plain-text wrapper with the raw text kept
    /// verbatim. Parse failure is not an error condition.
    pub fn from_model_output(raw: &str) -> Self {
        match serde_json::from_str::<StructuredItinerary>(raw) {
            Ok(parsed) => Itinerary::Structured(parsed),
            Err(_) => Itinerary::PlainText(PlainTextItinerary {
                title: FALLBACK_TITLE.to_string(),
                content: raw.to_string(),
                is_plain_text: true,
            }),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ItineraryEnvelope {
    pub itinerary: Itinerary,
}

#[derive(Debug, Serialize)]
pub struct ItineraryFailure {
    pub error: String,
    pub details: String,
}
