//! Workflow run operations.
//!
//! A workflow run executes a Studio workflow for an applicant. Unlike the
//! applicant and document collections, the workflow run list is returned as
//! a bare JSON array.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{require_id, resource_path, OnfidoClient};
use crate::clients::{Context, HttpMethod, HttpRequest};
use crate::error::Error;
use crate::rest::{ListResponse, OnfidoError, PageParams, Pagination, SortDirection};

/// Date format of the `created_at_gt` / `created_at_lt` filters.
const FILTER_DATE_FORMAT: &str = "%Y-%m-%d";

/// State of a workflow run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowRunStatus {
    Processing,
    AwaitingInput,
    Approved,
    Declined,
    Review,
    Abandoned,
    Error,
}

impl WorkflowRunStatus {
    /// Returns the wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::AwaitingInput => "awaiting_input",
            Self::Approved => "approved",
            Self::Declined => "declined",
            Self::Review => "review",
            Self::Abandoned => "abandoned",
            Self::Error => "error",
        }
    }
}

/// Settings of the hosted link that lets the applicant complete the run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateWorkflowRunLink {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_redirect_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expired_redirect_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// The hosted link of a workflow run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowRunLink {
    pub url: Option<String>,
    #[serde(flatten)]
    pub settings: CreateWorkflowRunLink,
}

/// A workflow run as returned by the API.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowRun {
    pub id: String,
    pub applicant_id: Option<String>,
    pub workflow_id: Option<String>,
    pub workflow_version_id: Option<u64>,
    pub dashboard_url: Option<String>,
    pub status: Option<WorkflowRunStatus>,
    pub tags: Vec<String>,
    pub customer_user_id: Option<String>,
    pub output: Option<serde_json::Value>,
    pub reasons: Vec<String>,
    /// Set when the run ended in an error.
    pub error: Option<OnfidoError>,
    pub sdk_token: Option<String>,
    pub link: Option<WorkflowRunLink>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body of a create request.
///
/// # Example
///
/// ```rust
/// use onfido::resources::CreateWorkflowRunPayload;
///
/// let payload = CreateWorkflowRunPayload::new("applicant-id", "workflow-id")
///     .tags(["onboarding"]);
///
/// let json = serde_json::to_value(&payload).unwrap();
/// assert_eq!(json["workflow_id"], "workflow-id");
/// assert_eq!(json["tags"][0], "onboarding");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CreateWorkflowRunPayload {
    pub applicant_id: String,
    pub workflow_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<CreateWorkflowRunLink>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub custom_data: HashMap<String, serde_json::Value>,
}

impl CreateWorkflowRunPayload {
    /// Creates a payload running `workflow_id` for `applicant_id`.
    #[must_use]
    pub fn new(applicant_id: impl Into<String>, workflow_id: impl Into<String>) -> Self {
        Self {
            applicant_id: applicant_id.into(),
            workflow_id: workflow_id.into(),
            ..Self::default()
        }
    }

    /// Adds tags to the run.
    #[must_use]
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Sets the hosted link settings.
    #[must_use]
    pub fn link(mut self, link: CreateWorkflowRunLink) -> Self {
        self.link = Some(link);
        self
    }

    /// Adds a custom data value consumed by the workflow.
    #[must_use]
    pub fn custom_data(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.custom_data.insert(key.into(), value);
        self
    }
}

/// Signed download location of a workflow run's evidence summary PDF.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowRunEvidenceSummary {
    pub url: String,
}

/// Options for [`OnfidoClient::list_workflow_runs`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListWorkflowRunsOption {
    /// Page number or page size.
    Pagination(Pagination),
    /// Only runs in this state.
    Status(WorkflowRunStatus),
    /// Only runs carrying all of these tags. Repeated options accumulate.
    Tags(Vec<String>),
    /// Only runs created after this date.
    CreatedAfter(NaiveDate),
    /// Only runs created before this date.
    CreatedBefore(NaiveDate),
    /// Order by creation date.
    Sort(SortDirection),
}

impl From<Pagination> for ListWorkflowRunsOption {
    fn from(option: Pagination) -> Self {
        Self::Pagination(option)
    }
}

#[derive(Debug, Default)]
struct ListWorkflowRunsParams {
    page: PageParams,
    status: Option<WorkflowRunStatus>,
    tags: Vec<String>,
    created_after: Option<NaiveDate>,
    created_before: Option<NaiveDate>,
    sort: Option<SortDirection>,
}

impl ListWorkflowRunsParams {
    fn from_options(options: &[ListWorkflowRunsOption]) -> Self {
        let mut params = Self::default();
        for option in options {
            match option {
                ListWorkflowRunsOption::Pagination(p) => params.page.apply(*p),
                ListWorkflowRunsOption::Status(status) => params.status = Some(*status),
                ListWorkflowRunsOption::Tags(tags) => params.tags.extend(tags.iter().cloned()),
                ListWorkflowRunsOption::CreatedAfter(date) => params.created_after = Some(*date),
                ListWorkflowRunsOption::CreatedBefore(date) => params.created_before = Some(*date),
                ListWorkflowRunsOption::Sort(sort) => params.sort = Some(*sort),
            }
        }
        params
    }

    fn to_query(&self) -> Vec<(String, String)> {
        let mut query = self.page.to_query();
        if let Some(status) = self.status {
            query.push(("status".to_string(), status.as_str().to_string()));
        }
        if !self.tags.is_empty() {
            query.push(("tags".to_string(), self.tags.join(",")));
        }
        if let Some(date) = self.created_after {
            query.push((
                "created_at_gt".to_string(),
                date.format(FILTER_DATE_FORMAT).to_string(),
            ));
        }
        if let Some(date) = self.created_before {
            query.push((
                "created_at_lt".to_string(),
                date.format(FILTER_DATE_FORMAT).to_string(),
            ));
        }
        if let Some(sort) = self.sort {
            query.push(("sort".to_string(), sort.as_str().to_string()));
        }
        query
    }
}

impl OnfidoClient {
    /// Starts a workflow run.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when the applicant or workflow id is
    /// empty, otherwise any API error.
    pub async fn create_workflow_run(
        &self,
        ctx: &Context,
        payload: &CreateWorkflowRunPayload,
    ) -> Result<WorkflowRun, Error> {
        require_id(&payload.applicant_id, "applicant_id")?;
        require_id(&payload.workflow_id, "workflow_id")?;
        let request = HttpRequest::builder(HttpMethod::Post, "/workflow_runs")
            .json(payload)
            .build()?;
        self.fetch(ctx, request).await
    }

    /// Retrieves a workflow run.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty id, otherwise any API error.
    pub async fn retrieve_workflow_run(
        &self,
        ctx: &Context,
        workflow_run_id: &str,
    ) -> Result<WorkflowRun, Error> {
        require_id(workflow_run_id, "workflow_run_id")?;
        let request = HttpRequest::builder(
            HttpMethod::Get,
            resource_path("workflow_runs", workflow_run_id, ""),
        )
        .build()?;
        self.fetch(ctx, request).await
    }

    /// Lists workflow runs.
    ///
    /// # Errors
    ///
    /// Returns any transport or API error.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use onfido::rest::SortDirection;
    /// use onfido::resources::{ListWorkflowRunsOption, WorkflowRunStatus};
    ///
    /// let runs = client
    ///     .list_workflow_runs(&ctx, &[
    ///         ListWorkflowRunsOption::Status(WorkflowRunStatus::Approved),
    ///         ListWorkflowRunsOption::Sort(SortDirection::Asc),
    ///     ])
    ///     .await?;
    /// ```
    pub async fn list_workflow_runs(
        &self,
        ctx: &Context,
        options: &[ListWorkflowRunsOption],
    ) -> Result<ListResponse<WorkflowRun>, Error> {
        let params = ListWorkflowRunsParams::from_options(options);
        let request = HttpRequest::builder(HttpMethod::Get, "/workflow_runs")
            .query(params.to_query())
            .build()?;
        self.fetch_list(ctx, request, |runs: Vec<WorkflowRun>| runs)
            .await
    }

    /// Returns the signed URL of a workflow run's evidence summary file.
    ///
    /// The API answers with a redirect; its `Location` is returned rather
    /// than followed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty id, and [`Error::Api`] for
    /// an API error or a redirect without a location.
    pub async fn retrieve_workflow_run_evidence_summary_file(
        &self,
        ctx: &Context,
        workflow_run_id: &str,
    ) -> Result<WorkflowRunEvidenceSummary, Error> {
        require_id(workflow_run_id, "workflow_run_id")?;
        let request = HttpRequest::builder(
            HttpMethod::Get,
            resource_path("workflow_runs", workflow_run_id, "/signed_evidence_file"),
        )
        .build()?;
        let url = self.resolve_location(ctx, request).await?;
        Ok(WorkflowRunEvidenceSummary { url })
    }
}
