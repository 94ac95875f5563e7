use egui_kittest::Harness;
use oam_business::{BusinessConfig, ListClient, RequestCache};
use wiremock::MockServer;

/// Default time to give the mock server between frames.
pub const DEFAULT_NETWORK_WAIT_MS: u64 = 50;

pub struct TestCtx<'a, T> {
    mock_server: MockServer,
    harness: Harness<'a, T>,
}

impl<'a, T> TestCtx<'a, T> {
    /// Builds the page against `mock_server`, whose mocks are already mounted.
    pub fn new(
        mock_server: MockServer,
        page: impl FnOnce(ListClient) -> T,
        show: impl FnMut(&mut egui::Ui, &mut T) + 'a,
    ) -> Self {
        let client = ListClient::new(BusinessConfig::new(mock_server.uri()), RequestCache::new());
        let harness = Harness::new_ui_state(show, page(client));

        Self {
            mock_server,
            harness,
        }
    }

    pub fn harness_mut(&mut self) -> &mut Harness<'a, T> {
        &mut self.harness
    }

    pub fn mock_server(&self) -> &MockServer {
        &self.mock_server
    }

    /// Steps frames while letting spawned fetches reach the mock server.
    pub async fn settle(&mut self) {
        for _ in 0..10 {
            self.harness.step();
            yield_wait_for_network(DEFAULT_NETWORK_WAIT_MS).await;
        }
        self.harness.step();
    }
}

pub async fn yield_wait_for_network(ms: u64) {
    tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
}

pub fn page_body(
    content: serde_json::Value,
    page_number: u32,
    total_pages: u32,
) -> serde_json::Value {
    serde_json::json!({
        "message": "OK",
        "data": {
            "content": content,
            "pageable": {
                "pageNumber": page_number,
                "pageSize": 20,
                "offset": page_number * 20,
                "numberOfElements": 2,
                "totalElements": total_pages * 20,
                "totalPages": total_pages,
                "sorted": true,
                "first": page_number == 0,
                "last": page_number + 1 == total_pages,
                "empty": false
            }
        }
    })
}
