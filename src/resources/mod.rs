//! Typed Onfido API resources.
//!
//! Each submodule defines the payload types of one resource and implements
//! its operations on [`OnfidoClient`](crate::OnfidoClient):
//!
//! | Resource | Operations |
//! |----------|------------|
//! | Applicant | create, retrieve, update, delete, restore, list |
//! | Document | upload, retrieve, list, download, download NFC face, download video |
//! | Workflow run | create, retrieve, list, evidence summary file |
//!
//! Operations taking an identifier reject an empty one with
//! [`Error::Validation`](crate::Error::Validation) before sending anything.

mod applicant;
mod document;
mod workflow_run;

pub use applicant::{
    Address, Applicant, Consent, CreateApplicantPayload, IdNumber, ListApplicantsOption, Location,
};
pub use document::{Document, DocumentFile, DocumentSide, DocumentType, UploadDocumentPayload};
pub use workflow_run::{
    CreateWorkflowRunLink, CreateWorkflowRunPayload, ListWorkflowRunsOption, WorkflowRun,
    WorkflowRunEvidenceSummary, WorkflowRunLink, WorkflowRunStatus,
};
