use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct LinkBuilder {
    api_base_url: String,
    web_base_url: String,
}

impl LinkBuilder {
    pub fn new(api_base_url: impl Into<String>, web_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            web_base_url: web_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn trip_confirmation(&self, trip_id: Uuid) -> String {
        format!("{}/trips/{trip_id}/confirm", self.api_base_url)
    }

    pub fn participant_confirmation(&self, participant_id: Uuid) -> String {
        format!("{}/participants/{participant_id}/confirm", self.api_base_url)
    }

    /// Public page of a trip; where confirmations redirect to.
    pub fn trip_view(&self, trip_id: Uuid) -> String {
        format!("{}/trips/{trip_id}", self.web_base_url)
    }
}
