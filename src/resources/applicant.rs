//! Applicant operations.
//!
//! An applicant is the person being verified. Applicants are deleted
//! asynchronously: a deleted applicant is scheduled for deletion and can be
//! restored until it is purged.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{require_id, resource_path, OnfidoClient};
use crate::clients::{Context, HttpMethod, HttpRequest};
use crate::error::Error;
use crate::rest::{ListResponse, PageParams, Pagination};

/// An applicant as returned by the API.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Applicant {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub dob: Option<NaiveDate>,
    pub phone_number: Option<String>,
    pub id_numbers: Vec<IdNumber>,
    pub address: Option<Address>,
    pub location: Option<Location>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Set when the applicant is scheduled for deletion.
    pub delete_at: Option<DateTime<Utc>>,
    pub href: Option<String>,
    pub sandbox: bool,
}

/// A government issued identifier of an applicant.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdNumber {
    #[serde(rename = "type")]
    pub id_type: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_code: Option<String>,
}

/// A consent given by the applicant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consent {
    pub name: String,
    pub granted: bool,
}

/// Where the applicant is, used for regulatory checks.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_of_residence: Option<String>,
}

/// A postal address.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub country: String,
    pub postcode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flat_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub town: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line3: Option<String>,
}

/// Body of create and update requests.
///
/// Unset fields are omitted, so an update only touches what is set.
///
/// # Example
///
/// ```rust
/// use onfido::resources::CreateApplicantPayload;
///
/// let payload = CreateApplicantPayload::new("Jane", "Doe")
///     .email("jane@example.com");
///
/// let json = serde_json::to_value(&payload).unwrap();
/// assert_eq!(json["first_name"], "Jane");
/// assert!(json.get("phone_number").is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CreateApplicantPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub id_numbers: Vec<IdNumber>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub consents: Vec<Consent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl CreateApplicantPayload {
    /// Creates a payload with the applicant's names.
    #[must_use]
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: Some(first_name.into()),
            last_name: Some(last_name.into()),
            ..Self::default()
        }
    }

    /// Sets the email address.
    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the date of birth.
    #[must_use]
    pub const fn dob(mut self, dob: NaiveDate) -> Self {
        self.dob = Some(dob);
        self
    }

    /// Sets the address.
    #[must_use]
    pub fn address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }

    /// Sets the location.
    #[must_use]
    pub fn location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }
}

/// Options for [`OnfidoClient::list_applicants`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListApplicantsOption {
    /// Page number or page size.
    Pagination(Pagination),
    /// Include applicants scheduled for deletion.
    IncludeDeleted,
}

impl From<Pagination> for ListApplicantsOption {
    fn from(option: Pagination) -> Self {
        Self::Pagination(option)
    }
}

#[derive(Debug, Default)]
struct ListApplicantsParams {
    page: PageParams,
    include_deleted: bool,
}

impl ListApplicantsParams {
    fn from_options(options: &[ListApplicantsOption]) -> Self {
        let mut params = Self::default();
        for option in options {
            match option {
                ListApplicantsOption::Pagination(p) => params.page.apply(*p),
                ListApplicantsOption::IncludeDeleted => params.include_deleted = true,
            }
        }
        params
    }

    fn to_query(&self) -> Vec<(String, String)> {
        let mut query = self.page.to_query();
        if self.include_deleted {
            query.push(("include_deleted".to_string(), "true".to_string()));
        }
        query
    }
}

#[derive(Deserialize)]
struct ApplicantList {
    #[serde(default)]
    applicants: Vec<Applicant>,
}

impl OnfidoClient {
    /// Creates an applicant.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] with type `validation_error` when a required
    /// field is missing or invalid.
    pub async fn create_applicant(
        &self,
        ctx: &Context,
        payload: &CreateApplicantPayload,
    ) -> Result<Applicant, Error> {
        let request = HttpRequest::builder(HttpMethod::Post, "/applicants")
            .json(payload)
            .build()?;
        self.fetch(ctx, request).await
    }

    /// Retrieves a single applicant.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty id and [`Error::Api`] with
    /// type `resource_not_found` for an unknown or deleted one.
    pub async fn retrieve_applicant(&self, ctx: &Context, applicant_id: &str) -> Result<Applicant, Error> {
        require_id(applicant_id, "applicant_id")?;
        let request =
            HttpRequest::builder(HttpMethod::Get, resource_path("applicants", applicant_id, ""))
                .build()?;
        self.fetch(ctx, request).await
    }

    /// Updates an applicant. Only fields set on `payload` change.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty id, otherwise any API error.
    pub async fn update_applicant(
        &self,
        ctx: &Context,
        applicant_id: &str,
        payload: &CreateApplicantPayload,
    ) -> Result<Applicant, Error> {
        require_id(applicant_id, "applicant_id")?;
        let request =
            HttpRequest::builder(HttpMethod::Put, resource_path("applicants", applicant_id, ""))
                .json(payload)
                .build()?;
        self.fetch(ctx, request).await
    }

    /// Schedules an applicant for deletion.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty id, otherwise any API error.
    pub async fn delete_applicant(&self, ctx: &Context, applicant_id: &str) -> Result<(), Error> {
        require_id(applicant_id, "applicant_id")?;
        let request =
            HttpRequest::builder(HttpMethod::Delete, resource_path("applicants", applicant_id, ""))
                .build()?;
        self.fetch_empty(ctx, request).await
    }

    /// Restores an applicant scheduled for deletion.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty id, otherwise any API error.
    pub async fn restore_applicant(&self, ctx: &Context, applicant_id: &str) -> Result<(), Error> {
        require_id(applicant_id, "applicant_id")?;
        let request = HttpRequest::builder(
            HttpMethod::Post,
            resource_path("applicants", applicant_id, "/restore"),
        )
        .build()?;
        self.fetch_empty(ctx, request).await
    }

    /// Lists applicants, newest first.
    ///
    /// # Errors
    ///
    /// Returns any transport or API error.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use onfido::rest::Pagination;
    /// use onfido::resources::ListApplicantsOption;
    ///
    /// let page = client
    ///     .list_applicants(&ctx, &[Pagination::Page(2).into(), Pagination::Limit(20).into()])
    ///     .await?;
    /// println!("{} of {:?}", page.len(), page.page().total);
    /// ```
    pub async fn list_applicants(
        &self,
        ctx: &Context,
        options: &[ListApplicantsOption],
    ) -> Result<ListResponse<Applicant>, Error> {
        let params = ListApplicantsParams::from_options(options);
        let request = HttpRequest::builder(HttpMethod::Get, "/applicants")
            .query(params.to_query())
            .build()?;
        self.fetch_list(ctx, request, |list: ApplicantList| list.applicants)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_applicant_deserializes_from_api_shape() {
        let applicant: Applicant = serde_json::from_value(json!({
            "id": "6c1b6e4a-6d1f-4c2e-9a0c-1b1d0c3f2e11",
            "first_name": "Jane",
            "last_name": "Doe",
            "dob": "1990-01-31",
            "created_at": "2024-05-01T10:00:00Z",
            "id_numbers": [{"type": "ssn", "value": "123-45-6789"}],
            "sandbox": true,
            "unknown_field": 1
        }))
        .unwrap();

        assert_eq!(applicant.first_name.as_deref(), Some("Jane"));
        assert_eq!(applicant.dob, NaiveDate::from_ymd_opt(1990, 1, 31));
        assert_eq!(applicant.id_numbers[0].id_type, "ssn");
        assert!(applicant.sandbox);
        assert!(applicant.delete_at.is_none());
    }

    #[test]
    fn test_payload_serializes_dob_as_date() {
        let payload = CreateApplicantPayload::new("Jane", "Doe")
            .dob(NaiveDate::from_ymd_opt(1990, 1, 31).unwrap());
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["dob"], "1990-01-31");
        assert!(value.get("consents").is_none());
        assert!(value.get("address").is_none());
    }

    #[test]
    fn test_list_params_merge_options() {
        let params = ListApplicantsParams::from_options(&[
            Pagination::Page(1).into(),
            Pagination::Limit(2).into(),
            ListApplicantsOption::IncludeDeleted,
            Pagination::Page(3).into(),
        ]);

        assert_eq!(
            params.to_query(),
            vec![
                ("page".to_string(), "3".to_string()),
                ("per_page".to_string(), "2".to_string()),
                ("include_deleted".to_string(), "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_list_params_default_to_empty_query() {
        assert!(ListApplicantsParams::from_options(&[]).to_query().is_empty());
    }
}
