//! Form buffers
//!
//! `FieldInput` is what the user types; it is only turned into a typed
//! `SoftwareFields` payload by `validate`. Neither buffer observes the
//! collection store after it is seeded.

use crate::shared::{SharedError, Software, SoftwareFields, SoftwareType};

/// Raw, unvalidated form input for the editable fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInput {
    pub display_name: String,
    pub description: String,
    pub software_type: String,
    pub vendor: String,
    pub manufacturer: String,
}

impl Default for FieldInput {
    fn default() -> Self {
        Self {
            display_name: String::new(),
            description: String::new(),
            software_type: SoftwareType::default().to_string(),
            vendor: String::new(),
            manufacturer: String::new(),
        }
    }
}

impl FieldInput {
    /// Seed from an existing record
    pub fn from_record(software: &Software) -> Self {
        Self {
            display_name: software.display_name.clone(),
            description: software.description.clone().unwrap_or_default(),
            software_type: software.software_type.to_string(),
            vendor: software.vendor.clone().unwrap_or_default(),
            manufacturer: software.manufacturer.clone().unwrap_or_default(),
        }
    }

    /// Check required fields and build the request payload
    pub fn validate(&self) -> Result<SoftwareFields, SharedError> {
        let display_name = self.display_name.trim();
        if display_name.is_empty() {
            return Err(SharedError::validation("display_name", "Display name is required"));
        }
        let software_type = self.software_type.parse::<SoftwareType>()?;

        Ok(SoftwareFields {
            display_name: display_name.to_string(),
            description: optional(&self.description),
            software_type,
            vendor: optional(&self.vendor),
            manufacturer: optional(&self.manufacturer),
        })
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Working copy of one record's editable fields while the edit modal is open
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    pub fields: FieldInput,
    session: u64,
    seeded_revision: u64,
    submitting: bool,
    error: Option<String>,
}

impl EditDraft {
    pub(crate) fn seed(software: &Software, revision: u64, session: u64) -> Self {
        Self {
            fields: FieldInput::from_record(software),
            session,
            seeded_revision: revision,
            submitting: false,
            error: None,
        }
    }

    /// Token identifying this edit session
    pub fn session(&self) -> u64 {
        self.session
    }

    /// Store revision of the record when the draft was seeded
    pub fn seeded_revision(&self) -> u64 {
        self.seeded_revision
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// In-modal error from the last failed submit
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub(crate) fn begin_submit(&mut self) {
        self.submitting = true;
        self.error = None;
    }

    pub(crate) fn fail(&mut self, message: impl Into<String>) {
        self.submitting = false;
        self.error = Some(message.into());
    }
}

/// State of the create modal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateForm {
    pub fields: FieldInput,
    open: bool,
    submitting: bool,
    error: Option<String>,
}

impl CreateForm {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Open with fresh defaults
    pub(crate) fn open(&mut self) {
        *self = Self {
            open: true,
            ..Self::default()
        };
    }

    pub(crate) fn close(&mut self) {
        self.open = false;
        self.submitting = false;
        self.error = None;
    }

    pub(crate) fn begin_submit(&mut self) {
        self.submitting = true;
        self.error = None;
    }

    /// Keep the form open with its input intact so the user can retry
    pub(crate) fn fail(&mut self, message: impl Into<String>) {
        self.submitting = false;
        self.error = Some(message.into());
    }
}
