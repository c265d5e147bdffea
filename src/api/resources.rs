//! One accessor per backend operation.
//!
//! Each accessor maps (resource, verb, path) to a single HTTP call and returns
//! the decoded body unchanged. Nothing here validates, transforms or caches.

use crate::models::{
    Agent, AgentForm, AgentList, Call, CallList, CallSummary, MessageResponse, TriggerCallRequest,
};

use super::{ApiClient, ApiError};

/// The backend operations the views depend on.
///
/// [`ApiClient`] implements this over HTTP; tests substitute an in-memory
/// backend.
pub trait Backend {
    /// `GET /agents`
    fn list_agents(&self) -> Result<AgentList, ApiError>;
    /// `POST /agents`
    fn create_agent(&self, form: &AgentForm) -> Result<Agent, ApiError>;
    /// `PUT /agents/{id}`
    fn update_agent(&self, id: &str, form: &AgentForm) -> Result<Agent, ApiError>;
    /// `DELETE /agents/{id}`
    fn delete_agent(&self, id: &str) -> Result<MessageResponse, ApiError>;
    /// `GET /agents/{id}`
    fn get_agent(&self, id: &str) -> Result<Agent, ApiError>;
    /// `POST /calls/trigger`
    fn trigger_call(&self, request: &TriggerCallRequest) -> Result<Call, ApiError>;
    /// `GET /calls`
    fn list_calls(&self) -> Result<CallList, ApiError>;
    /// `GET /calls/{id}`
    fn get_call(&self, id: &str) -> Result<Call, ApiError>;
    /// `GET /calls/{id}/summary`
    fn get_call_summary(&self, id: &str) -> Result<CallSummary, ApiError>;
}

impl Backend for ApiClient {
    fn list_agents(&self) -> Result<AgentList, ApiError> {
        self.get("/agents")
    }

    fn create_agent(&self, form: &AgentForm) -> Result<Agent, ApiError> {
        self.post("/agents", form)
    }

    fn update_agent(&self, id: &str, form: &AgentForm) -> Result<Agent, ApiError> {
        self.put(&format!("/agents/{id}"), form)
    }

    fn delete_agent(&self, id: &str) -> Result<MessageResponse, ApiError> {
        self.delete(&format!("/agents/{id}"))
    }

    fn get_agent(&self, id: &str) -> Result<Agent, ApiError> {
        self.get(&format!("/agents/{id}"))
    }

    fn trigger_call(&self, request: &TriggerCallRequest) -> Result<Call, ApiError> {
        self.post("/calls/trigger", request)
    }

    fn list_calls(&self) -> Result<CallList, ApiError> {
        self.get("/calls")
    }

    fn get_call(&self, id: &str) -> Result<Call, ApiError> {
        self.get(&format!("/calls/{id}"))
    }

    fn get_call_summary(&self, id: &str) -> Result<CallSummary, ApiError> {
        self.get(&format!("/calls/{id}/summary"))
    }
}
