pub mod chat;
pub mod itinerary;

pub(crate) fn default_language() -> String {
    "English".to_string()
}
