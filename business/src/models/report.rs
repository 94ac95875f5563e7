use serde::{Deserialize, Serialize};

/// Asset counts of one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportItem {
    #[serde(default)]
    pub id: i64,
    pub category: String,
    pub total: u64,
    pub assigned: u64,
    pub available: u64,
    pub not_available: u64,
    pub waiting_for_recycling: u64,
    pub recycled: u64,
}

impl ReportItem {
    /// Count for a report column key, e.g. `notAvailable`.
    pub fn count(&self, key: &str) -> Option<u64> {
        match key {
            "total" => Some(self.total),
            "assigned" => Some(self.assigned),
            "available" => Some(self.available),
            "notAvailable" => Some(self.not_available),
            "waitingForRecycling" => Some(self.waiting_for_recycling),
            "recycled" => Some(self.recycled),
            _ => None,
        }
    }
}
