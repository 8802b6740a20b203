//! Document operations.
//!
//! Documents are identity documents (passports, driving licences, ...)
//! uploaded for an applicant. Downloads return the raw file bytes.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{require_id, resource_path, OnfidoClient};
use crate::clients::{Context, HttpMethod, HttpRequest, InvalidHttpRequestError, MultipartForm};
use crate::error::Error;
use crate::resources::applicant::Location;
use crate::rest::ListResponse;

/// Kind of identity document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Passport,
    DrivingLicence,
    NationalIdentityCard,
    ResidencePermit,
    WorkPermit,
    VoterId,
    TaxId,
    #[default]
    #[serde(other)]
    Unknown,
}

impl DocumentType {
    /// Returns the wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Passport => "passport",
            Self::DrivingLicence => "driving_licence",
            Self::NationalIdentityCard => "national_identity_card",
            Self::ResidencePermit => "residence_permit",
            Self::WorkPermit => "work_permit",
            Self::VoterId => "voter_id",
            Self::TaxId => "tax_id",
            Self::Unknown => "unknown",
        }
    }
}

/// Side of a two-sided document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentSide {
    Front,
    Back,
}

impl DocumentSide {
    /// Returns the wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Back => "back",
        }
    }
}

/// A document as returned by the API.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    pub id: String,
    pub applicant_id: Option<String>,
    #[serde(rename = "type")]
    pub document_type: DocumentType,
    pub side: Option<DocumentSide>,
    pub issuing_country: Option<String>,
    pub file_type: Option<String>,
    pub file_name: Option<String>,
    pub file_size: Option<u64>,
    pub created_at: Option<DateTime<Utc>>,
    pub href: Option<String>,
    pub download_href: Option<String>,
}

/// File content to upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentFile {
    filename: String,
    content: Vec<u8>,
}

impl DocumentFile {
    /// Wraps in-memory file content.
    #[must_use]
    pub fn new(filename: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content,
        }
    }

    /// Reads a file from disk.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the file cannot be read.
    pub fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read(path)?;
        let filename = path
            .file_name()
            .map_or_else(|| "document".to_string(), |name| name.to_string_lossy().into_owned());
        Ok(Self { filename, content })
    }

    /// Returns the file name sent with the upload.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Returns the file content.
    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.content
    }
}

/// Body of an upload request.
///
/// # Example
///
/// ```rust
/// use onfido::resources::{DocumentFile, DocumentSide, DocumentType, UploadDocumentPayload};
///
/// let payload = UploadDocumentPayload::new(
///     "applicant-id",
///     DocumentType::DrivingLicence,
///     DocumentFile::new("front.jpg", b"\xFF\xD8\xFF".to_vec()),
/// )
/// .side(DocumentSide::Front)
/// .issuing_country("GBR");
///
/// assert_eq!(payload.applicant_id, "applicant-id");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadDocumentPayload {
    pub applicant_id: String,
    pub document_type: DocumentType,
    pub file: DocumentFile,
    pub side: Option<DocumentSide>,
    pub issuing_country: Option<String>,
    pub file_type: Option<String>,
    pub location: Option<Location>,
    pub validate_image_quality: bool,
}

impl UploadDocumentPayload {
    /// Creates a payload with the required fields.
    #[must_use]
    pub fn new(applicant_id: impl Into<String>, document_type: DocumentType, file: DocumentFile) -> Self {
        Self {
            applicant_id: applicant_id.into(),
            document_type,
            file,
            side: None,
            issuing_country: None,
            file_type: None,
            location: None,
            validate_image_quality: false,
        }
    }

    /// Sets the document side.
    #[must_use]
    pub const fn side(mut self, side: DocumentSide) -> Self {
        self.side = Some(side);
        self
    }

    /// Sets the issuing country (ISO 3166-1 alpha-3).
    #[must_use]
    pub fn issuing_country(mut self, country: impl Into<String>) -> Self {
        self.issuing_country = Some(country.into());
        self
    }

    /// Sets the file type reported to the API.
    #[must_use]
    pub fn file_type(mut self, file_type: impl Into<String>) -> Self {
        self.file_type = Some(file_type.into());
        self
    }

    /// Sets the applicant's location.
    #[must_use]
    pub fn location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Asks the API to reject images of insufficient quality.
    #[must_use]
    pub const fn validate_image_quality(mut self, validate: bool) -> Self {
        self.validate_image_quality = validate;
        self
    }

    fn to_form(&self) -> Result<MultipartForm, InvalidHttpRequestError> {
        let mut form = MultipartForm::new()
            .text("applicant_id", self.applicant_id.as_str())
            .text("type", self.document_type.as_str());

        if let Some(side) = self.side {
            form = form.text("side", side.as_str());
        }
        if let Some(country) = &self.issuing_country {
            form = form.text("issuing_country", country.as_str());
        }
        if let Some(file_type) = &self.file_type {
            form = form.text("file_type", file_type.as_str());
        }
        if self.validate_image_quality {
            form = form.text("validate_image_quality", "true");
        }
        if let Some(location) = &self.location {
            let json = serde_json::to_string(location).map_err(|e| {
                InvalidHttpRequestError::Serialize {
                    reason: e.to_string(),
                }
            })?;
            form = form.text("location", json);
        }

        Ok(form.file("file", self.file.filename(), self.file.content.clone()))
    }
}

#[derive(Deserialize)]
struct DocumentList {
    #[serde(default)]
    documents: Vec<Document>,
}

impl OnfidoClient {
    /// Uploads a document for an applicant.
    ///
    /// The file part's content type is detected from the file bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty applicant id or file, and
    /// [`Error::Api`] when the API rejects the upload.
    pub async fn upload_document(
        &self,
        ctx: &Context,
        payload: &UploadDocumentPayload,
    ) -> Result<Document, Error> {
        require_id(&payload.applicant_id, "applicant_id")?;
        if payload.file.content.is_empty() {
            return Err(Error::Validation { field: "file" });
        }

        let request = HttpRequest::builder(HttpMethod::Post, "/documents")
            .multipart(&payload.to_form()?)
            .build()?;
        self.fetch(ctx, request).await
    }

    /// Retrieves a document's metadata.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty id, otherwise any API error.
    pub async fn retrieve_document(&self, ctx: &Context, document_id: &str) -> Result<Document, Error> {
        require_id(document_id, "document_id")?;
        let request =
            HttpRequest::builder(HttpMethod::Get, resource_path("documents", document_id, ""))
                .build()?;
        self.fetch(ctx, request).await
    }

    /// Lists the documents of an applicant.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty applicant id, otherwise any
    /// API error.
    pub async fn list_documents(
        &self,
        ctx: &Context,
        applicant_id: &str,
    ) -> Result<ListResponse<Document>, Error> {
        require_id(applicant_id, "applicant_id")?;
        let request = HttpRequest::builder(HttpMethod::Get, "/documents")
            .query_param("applicant_id", applicant_id)
            .build()?;
        self.fetch_list(ctx, request, |list: DocumentList| list.documents)
            .await
    }

    /// Downloads the document file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty id and [`Error::Api`] for
    /// an API error or an empty body.
    pub async fn download_document(&self, ctx: &Context, document_id: &str) -> Result<Vec<u8>, Error> {
        self.download_document_part(ctx, document_id, "/download").await
    }

    /// Downloads the face image read from the document's NFC chip.
    ///
    /// # Errors
    ///
    /// Same as [`download_document`](Self::download_document).
    pub async fn download_document_nfc_face(
        &self,
        ctx: &Context,
        document_id: &str,
    ) -> Result<Vec<u8>, Error> {
        self.download_document_part(ctx, document_id, "/nfc_face").await
    }

    /// Downloads the video recorded while capturing the document.
    ///
    /// # Errors
    ///
    /// Same as [`download_document`](Self::download_document).
    pub async fn download_document_video(
        &self,
        ctx: &Context,
        document_id: &str,
    ) -> Result<Vec<u8>, Error> {
        self.download_document_part(ctx, document_id, "/video/download")
            .await
    }

    async fn download_document_part(
        &self,
        ctx: &Context,
        document_id: &str,
        suffix: &str,
    ) -> Result<Vec<u8>, Error> {
        require_id(document_id, "document_id")?;
        let request =
            HttpRequest::builder(HttpMethod::Get, resource_path("documents", document_id, suffix))
                .header("Accept", "*/*")
                .build()?;
        self.download(ctx, request).await
    }
}
