//! Test doubles shared by the unit tests

use async_trait::async_trait;
use scpush_client::{GatewayError, HttpGateway, HttpResponse, Result};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;

/// A request seen by [`ScriptedGateway`]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub path: String,
    pub body: Option<String>,
    pub headers: Vec<(String, String)>,
}

/// In-memory gateway replaying canned responses
///
/// POST always answers with the configured response. GETs are served in
/// order; once the script runs out the gateway either keeps reporting a
/// running job or fails with a connection error.
pub struct ScriptedGateway {
    post_response: Mutex<Option<Result<HttpResponse>>>,
    get_responses: Mutex<VecDeque<Result<HttpResponse>>>,
    pending_when_exhausted: bool,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self {
            post_response: Mutex::new(None),
            get_responses: Mutex::new(VecDeque::new()),
            pending_when_exhausted: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn on_post(self, response: Result<HttpResponse>) -> Self {
        *self.post_response.lock().unwrap() = Some(response);
        self
    }

    pub fn then_get(self, response: Result<HttpResponse>) -> Self {
        self.get_responses.lock().unwrap().push_back(response);
        self
    }

    /// Queues a 200 task resource carrying `message`
    pub fn then_message(self, message: &str, percent: Option<u32>) -> Self {
        self.then_get(Ok(task_response(200, message, percent)))
    }

    pub fn then_status_code(self, status: u16) -> Self {
        self.then_get(Ok(HttpResponse::new(status, "{\"error\":\"busy\"}")))
    }

    pub fn pending_forever(mut self) -> Self {
        self.pending_when_exhausted = true;
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn get_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == "GET")
            .count()
    }
}

#[async_trait]
impl HttpGateway for ScriptedGateway {
    fn base_url(&self) -> &str {
        "https://idrac.test"
    }

    async fn post(
        &self,
        path: &str,
        body: String,
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method: "POST",
            path: path.to_string(),
            body: Some(body),
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });

        let scripted = self.post_response.lock().unwrap().take();
        scripted.unwrap_or_else(|| Err(GatewayError::Connection("no POST scripted".to_string())))
    }

    async fn get(&self, path: &str) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method: "GET",
            path: path.to_string(),
            body: None,
            headers: Vec::new(),
        });

        let next = self.get_responses.lock().unwrap().pop_front();
        match next {
            Some(response) => response,
            None if self.pending_when_exhausted => {
                Ok(task_response(200, "Job in progress", Some(10)))
            }
            None => Err(GatewayError::Connection("GET script exhausted".to_string())),
        }
    }
}

/// Task resource response as the controller renders it
pub fn task_response(status: u16, message: &str, percent: Option<u32>) -> HttpResponse {
    let body = json!({
        "Id": "JID_999",
        "Messages": [],
        "Oem": { "Dell": {
            "Message": message,
            "PercentComplete": percent,
            "JobState": "Running"
        }}
    });
    HttpResponse::new(status, body.to_string())
}

/// 202 Accepted as returned by the import action
pub fn accepted(job_id: &str) -> HttpResponse {
    HttpResponse::new(202, "").with_header(
        "Location",
        format!("/redfish/v1/TaskService/Tasks/{}", job_id),
    )
}
