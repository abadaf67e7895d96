//! Prompt construction for both endpoints. The itinerary JSON skeleton is a
//! contract with the front end; field names must not drift.

use crate::models::chat::ChatRequest;
use crate::models::itinerary::ItineraryRequest;
use crate::openai_client::ChatMessage;

pub const ITINERARY_SYSTEM_PROMPT: &str = "You are an expert travel planner specializing in \
     Jharkhand tourism. Create detailed, culturally sensitive, and sustainable travel itineraries.";

/// Only this many trailing history entries are forwarded to the gateway.
/// The caller may accumulate history without bound; the oldest turns are
/// dropped first so the newest context always survives.
pub const MAX_HISTORY_TURNS: usize = 32;

/// System + user message pair for the itinerary planner.
pub fn build_itinerary_messages(request: &ItineraryRequest) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(ITINERARY_SYSTEM_PROMPT),
        ChatMessage::user(itinerary_prompt(request)),
    ]
}

fn itinerary_prompt(request: &ItineraryRequest) -> String {
    format!(
        r#"Create a personalized {duration}-day itinerary for Jharkhand, India based on these preferences:
- Budget: {budget}
- Interests: {interests}
- Additional preferences: {preferences}
- Response language: {language}

Include:
- Day-by-day detailed schedule
- Specific destinations in Jharkhand (like Betla National Park, Hundru Falls, tribal villages)
- Cultural experiences and eco-tourism activities
- Local food recommendations
- Transportation suggestions
- Estimated costs for each activity
- Cultural etiquette tips

Format as a structured JSON with this format:
{{
  "title": "Your Jharkhand Adventure",
  "days": [
    {{
      "day": 1,
      "title": "Day title",
      "activities": [
        {{
          "time": "09:00 AM",
          "activity": "Activity name",
          "location": "Location",
          "description": "Detailed description",
          "cost": "₹500",
          "tips": "Helpful tips"
        }}
      ]
    }}
  ],
  "totalBudget": "₹15000",
  "tips": ["General travel tips for Jharkhand"]
}}"#,
        duration = request.duration,
        budget = request.budget,
        interests = request.interests.join(", "),
        preferences = request.preferences,
        language = request.language,
    )
}

/// System message, capped history in original order, then the new user turn.
/// The ordering is the entire memory mechanism; the service itself keeps
/// nothing between calls.
pub fn build_chat_messages(request: &ChatRequest) -> Vec<ChatMessage> {
    let history = if request.chat_history.len() > MAX_HISTORY_TURNS {
        &request.chat_history[request.chat_history.len() - MAX_HISTORY_TURNS..]
    } else {
        &request.chat_history[..]
    };

    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(chat_system_prompt(&request.language)));
    messages.extend(history.iter().cloned().map(ChatMessage::from));
    messages.push(ChatMessage::user(request.message.clone()));
    messages
}

fn chat_system_prompt(language: &str) -> String {
    format!(
        r#"You are a multilingual tourism assistant for Jharkhand, India. You help tourists with:
- Information about destinations, culture, and activities in Jharkhand
- Travel planning and recommendations
- Cultural insights and local customs
- Transportation and accommodation suggestions
- Safety tips and practical advice

Always respond in {language} unless specifically asked to use another language.
Be friendly, informative, and culturally sensitive.
Focus specifically on Jharkhand tourism - destinations like Betla National Park, Hundru Falls, tribal villages, cultural festivals, eco-tourism, etc.

If asked about places outside Jharkhand, politely redirect to Jharkhand attractions."#
    )
}
