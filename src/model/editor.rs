//! In-memory endpoint editing.
//!
//! [`EndpointEditor`] owns the working set of endpoints between extraction
//! and generation. All operations are total: lookups that miss report it in
//! the return value, and only an empty path on add/update is an error.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::utils::endpoint_id;
use crate::model::endpoint::{Endpoint, HttpMethod, McpRole, Parameter, ResponseSpec};

/// Errors from the editing operations that can actually fail.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("endpoint path must not be empty")]
    EmptyPath,
}

/// Input for [`EndpointEditor::add_endpoint`]. The id and the role default
/// are derived, so callers only describe the endpoint itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointDraft {
    pub method: HttpMethod,
    pub path: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub responses: Vec<ResponseSpec>,
    #[serde(rename = "mcpType", default, skip_serializing_if = "Option::is_none")]
    pub mcp_type: Option<McpRole>,
}

/// Partial update for [`EndpointEditor::update_endpoint`]. Absent fields are
/// left untouched; the id stays stable even when path or method change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EndpointPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<HttpMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<Parameter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responses: Option<Vec<ResponseSpec>>,
    #[serde(rename = "mcpType", default, skip_serializing_if = "Option::is_none")]
    pub mcp_type: Option<McpRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<bool>,
}

/// Criteria for [`EndpointEditor::filter`]. All set fields must match.
#[derive(Debug, Clone, Default)]
pub struct EndpointFilter {
    pub method: Option<HttpMethod>,
    pub role: Option<McpRole>,
    pub selected: Option<bool>,
    pub category: Option<String>,
    /// Case-insensitive substring match over path and description.
    pub text: Option<String>,
}

impl EndpointFilter {
    fn matches(&self, endpoint: &Endpoint) -> bool {
        if let Some(method) = self.method
            && endpoint.method != method
        {
            return false;
        }
        if let Some(role) = self.role
            && endpoint.mcp_type != role
        {
            return false;
        }
        if let Some(selected) = self.selected
            && endpoint.selected != selected
        {
            return false;
        }
        if let Some(category) = &self.category
            && endpoint.category() != category
        {
            return false;
        }
        if let Some(text) = &self.text {
            let needle = text.to_lowercase();
            let in_path = endpoint.path.to_lowercase().contains(&needle);
            let in_desc = endpoint.description.to_lowercase().contains(&needle);
            if !in_path && !in_desc {
                return false;
            }
        }
        true
    }
}

/// The editable working set.
#[derive(Debug, Clone, Default)]
pub struct EndpointEditor {
    endpoints: Vec<Endpoint>,
}

impl EndpointEditor {
    pub fn new(endpoints: Vec<Endpoint>) -> Self {
        Self { endpoints }
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn into_endpoints(self) -> Vec<Endpoint> {
        self.endpoints
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Endpoint> {
        self.endpoints.iter().find(|e| e.id == id)
    }

    /// Flips the `selected` flag on one endpoint. Returns `false` when the
    /// id is unknown.
    pub fn toggle_selection(&mut self, id: &str) -> bool {
        match self.endpoints.iter_mut().find(|e| e.id == id) {
            Some(endpoint) => {
                endpoint.selected = !endpoint.selected;
                true
            }
            None => false,
        }
    }

    /// Sets `selected` on every endpoint in a category. Returns how many
    /// endpoints were affected; an unknown category affects zero.
    pub fn toggle_category(&mut self, category: &str, selected: bool) -> usize {
        let mut affected = 0;
        for endpoint in &mut self.endpoints {
            if endpoint.category() == category {
                endpoint.selected = selected;
                affected += 1;
            }
        }
        affected
    }

    /// Assigns a role to one endpoint. Returns `false` when the id is
    /// unknown.
    pub fn set_role(&mut self, id: &str, role: McpRole) -> bool {
        match self.endpoints.iter_mut().find(|e| e.id == id) {
            Some(endpoint) => {
                endpoint.mcp_type = role;
                true
            }
            None => false,
        }
    }

    /// Reassigns every endpoint its verb-default role, overriding manual
    /// choices. Returns how many endpoints changed role.
    pub fn auto_classify(&mut self) -> usize {
        let mut changed = 0;
        for endpoint in &mut self.endpoints {
            let default = McpRole::default_for(endpoint.method);
            if endpoint.mcp_type != default {
                endpoint.mcp_type = default;
                changed += 1;
            }
        }
        changed
    }

    /// Adds a new endpoint. The id is derived from method and path; when
    /// that id is already taken a numeric suffix keeps it unique.
    pub fn add_endpoint(&mut self, draft: EndpointDraft) -> Result<&Endpoint, EditError> {
        if draft.path.trim().is_empty() {
            return Err(EditError::EmptyPath);
        }

        let base_id = endpoint_id(draft.method.as_str(), &draft.path);
        let mut id = base_id.clone();
        let mut n = 2;
        while self.endpoints.iter().any(|e| e.id == id) {
            id = format!("{base_id}-{n}");
            n += 1;
        }

        let mcp_type = draft
            .mcp_type
            .unwrap_or_else(|| McpRole::default_for(draft.method));
        self.endpoints.push(Endpoint {
            id,
            path: draft.path,
            method: draft.method,
            description: draft.description,
            parameters: draft.parameters,
            responses: draft.responses,
            mcp_type,
            selected: true,
        });
        Ok(self.endpoints.last().unwrap())
    }

    /// Applies a partial update. Returns `Ok(false)` when the id is unknown
    /// and errors only when the patch would set an empty path.
    pub fn update_endpoint(&mut self, id: &str, patch: EndpointPatch) -> Result<bool, EditError> {
        if let Some(path) = &patch.path
            && path.trim().is_empty()
        {
            return Err(EditError::EmptyPath);
        }

        let Some(endpoint) = self.endpoints.iter_mut().find(|e| e.id == id) else {
            return Ok(false);
        };

        if let Some(method) = patch.method {
            endpoint.method = method;
        }
        if let Some(path) = patch.path {
            endpoint.path = path;
        }
        if let Some(description) = patch.description {
            endpoint.description = description;
        }
        if let Some(parameters) = patch.parameters {
            endpoint.parameters = parameters;
        }
        if let Some(responses) = patch.responses {
            endpoint.responses = responses;
        }
        if let Some(mcp_type) = patch.mcp_type {
            endpoint.mcp_type = mcp_type;
        }
        if let Some(selected) = patch.selected {
            endpoint.selected = selected;
        }
        Ok(true)
    }

    /// Removes one endpoint. Returns `false` when the id is unknown.
    pub fn remove_endpoint(&mut self, id: &str) -> bool {
        let before = self.endpoints.len();
        self.endpoints.retain(|e| e.id != id);
        self.endpoints.len() != before
    }

    /// Read-only query over the working set.
    pub fn filter(&self, filter: &EndpointFilter) -> Vec<&Endpoint> {
        self.endpoints
            .iter()
            .filter(|e| filter.matches(e))
            .collect()
    }

    /// Distinct categories present, in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for endpoint in &self.endpoints {
            let category = endpoint.category();
            if !seen.iter().any(|c| c == category) {
                seen.push(category.to_string());
            }
        }
        seen
    }
}
