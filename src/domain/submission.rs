//! src/domain/submission.rs

use crate::domain::RequiredField;

/// Raw contact form fields, as sent by the front-end. Absent keys are empty.
#[derive(serde::Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactFormData {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub project_type: String,
    pub timeline: String,
    pub budget: String,
    pub message: String,
}

impl ContactFormData {
    /// Assigns a multipart text part to the field with the same wire name.
    /// Returns `false` for names that are not part of the form.
    pub fn set(&mut self, wire_name: &str, value: String) -> bool {
        let slot = match wire_name {
            "name" => &mut self.name,
            "email" => &mut self.email,
            "phone" => &mut self.phone,
            "location" => &mut self.location,
            "projectType" => &mut self.project_type,
            "timeline" => &mut self.timeline,
            "budget" => &mut self.budget,
            "message" => &mut self.message,
            _ => return false,
        };
        *slot = value;
        true
    }
}

/// How the submission reached us. Multipart uploads come from the project
/// inquiry form, where a project type is mandatory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionSource {
    Json,
    Multipart,
}

impl SubmissionSource {
    fn requires_project_type(self) -> bool {
        matches!(self, SubmissionSource::Multipart)
    }
}

#[derive(Debug, Clone)]
pub struct Submission {
    pub name: RequiredField,
    pub email: RequiredField,
    pub phone: String,
    pub location: String,
    pub project_type: String,
    pub timeline: String,
    pub budget: String,
    pub message: RequiredField,
}

impl Submission {
    /// Validates the raw fields. The error lists every missing field by its
    /// wire name, in form order.
    pub fn parse(form: ContactFormData, source: SubmissionSource) -> Result<Self, String> {
        let mut missing = Vec::new();

        let name = RequiredField::parse(form.name).ok();
        if name.is_none() {
            missing.push("name");
        }
        let email = RequiredField::parse(form.email).ok();
        if email.is_none() {
            missing.push("email");
        }
        let project_type = form.project_type.trim().to_string();
        if source.requires_project_type() && project_type.is_empty() {
            missing.push("projectType");
        }
        let message = RequiredField::parse(form.message).ok();
        if message.is_none() {
            missing.push("message");
        }

        match (name, email, message) {
            (Some(name), Some(email), Some(message)) if missing.is_empty() => Ok(Self {
                name,
                email,
                phone: form.phone.trim().to_string(),
                location: form.location.trim().to_string(),
                project_type,
                timeline: form.timeline.trim().to_string(),
                budget: form.budget.trim().to_string(),
                message,
            }),
            _ => Err(format!("Missing required fields: {}", missing.join(", "))),
        }
    }
}
