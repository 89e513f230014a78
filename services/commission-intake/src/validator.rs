// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Commission request validator.
//!
//! Turns an untrusted JSON payload into a [`CommissionRequest`], or reports
//! every violated constraint at once:
//! - Required text fields must be non-empty
//! - Both email fields must be well formed and identical
//! - Service options must be one of the offered choices
//! - The terms must have been accepted

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use tracing::debug;
use validator::validate_email;

/// Machine-readable violation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCode {
    /// Field missing or of the wrong JSON type
    InvalidType,
    /// Text field empty
    TooSmall,
    /// Text field present but malformed
    InvalidString,
    /// Value outside the offered choices
    InvalidEnumValue,
    /// Cross-field or semantic rule
    Custom,
}

/// One violated constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// Path to the offending field; empty when the payload itself is wrong
    pub path: Vec<String>,
    pub code: ViolationCode,
    pub message: String,
}

impl FieldViolation {
    fn new(field: &str, code: ViolationCode, message: impl Into<String>) -> Self {
        Self {
            path: vec![field.to_string()],
            code,
            message: message.into(),
        }
    }

    /// Top-level field this violation refers to.
    pub fn field(&self) -> Option<&str> {
        self.path.first().map(String::as_str)
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.field() {
            Some(field) => write!(f, "{}: {}", field, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// A fixed set of labelled options a form field can take.
pub trait Choice: Sized + Copy {
    /// Every accepted label, in display order.
    const LABELS: &'static [&'static str];

    fn from_label(label: &str) -> Option<Self>;

    fn label(&self) -> &'static str;
}

/// Switch lubing service level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SwitchesLubing {
    #[serde(rename = "No")]
    No,
    #[serde(rename = "Yes")]
    Yes,
    #[serde(rename = "Yes + Films")]
    YesFilms,
    #[serde(rename = "Yes + Films + Springs")]
    YesFilmsSprings,
}

impl Choice for SwitchesLubing {
    const LABELS: &'static [&'static str] = &["No", "Yes", "Yes + Films", "Yes + Films + Springs"];

    fn from_label(label: &str) -> Option<Self> {
        match label {
            "No" => Some(Self::No),
            "Yes" => Some(Self::Yes),
            "Yes + Films" => Some(Self::YesFilms),
            "Yes + Films + Springs" => Some(Self::YesFilmsSprings),
            _ => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::No => "No",
            Self::Yes => "Yes",
            Self::YesFilms => "Yes + Films",
            Self::YesFilmsSprings => "Yes + Films + Springs",
        }
    }
}

/// Plain yes/no answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum YesNo {
    Yes,
    No,
}

impl Choice for YesNo {
    const LABELS: &'static [&'static str] = &["Yes", "No"];

    fn from_label(label: &str) -> Option<Self> {
        match label {
            "Yes" => Some(Self::Yes),
            "No" => Some(Self::No),
            _ => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }
}

/// A validated keyboard commission request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionRequest {
    pub name: String,
    pub country: String,
    pub email: String,
    pub discord_username: String,
    pub keyboard_kit_name: String,
    pub plate_choice: String,
    pub layout: String,
    pub stabilizers: String,
    pub switches: String,
    pub switches_lubing: SwitchesLubing,
    pub providing_keycaps: YesNo,
    pub return_shipping_insurance: YesNo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_notes: Option<String>,
    pub agreed_to_terms: bool,
}

/// Validate an untrusted JSON payload.
pub fn validate(payload: &Value) -> Result<CommissionRequest, Vec<FieldViolation>> {
    let Some(object) = payload.as_object() else {
        debug!(received = json_type(payload), "Commission payload is not an object");
        return Err(vec![FieldViolation {
            path: Vec::new(),
            code: ViolationCode::InvalidType,
            message: format!("Expected object, received {}", json_type(payload)),
        }]);
    };

    let mut fields = Fields {
        object,
        violations: Vec::new(),
    };

    let name = fields.required_text("name", "Name is required");
    let country = fields.required_text("country", "Country is required");
    let email = fields.email("email");
    let confirm_email = fields.email("confirmEmail");
    let discord_username = fields.required_text("discordUsername", "Discord username is required");
    let keyboard_kit_name = fields.required_text("keyboardKitName", "Keyboard kit name is required");
    let plate_choice = fields.required_text("plateChoice", "Plate choice is required");
    let layout = fields.required_text("layout", "Layout is required");
    let stabilizers = fields.required_text("stabilizers", "Stabilizers information is required");
    let switches = fields.required_text("switches", "Switches information is required");
    let switches_lubing = fields.choice::<SwitchesLubing>("switchesLubing");
    let providing_keycaps = fields.choice::<YesNo>("providingKeycaps");
    let return_shipping_insurance = fields.choice::<YesNo>("returnShippingInsurance");
    let additional_notes = fields.optional_text("additionalNotes");
    let agreed_to_terms = fields.accepted("agreedToTerms", "You must agree to the terms");

    // Reported even when one side is malformed, so a typo never slips through.
    let raw_email = object.get("email").and_then(Value::as_str);
    let raw_confirm = object.get("confirmEmail").and_then(Value::as_str);
    if let (Some(a), Some(b)) = (raw_email, raw_confirm) {
        if a != b {
            fields.violations.push(FieldViolation::new(
                "confirmEmail",
                ViolationCode::Custom,
                "Emails don't match",
            ));
        }
    }

    let violations = fields.violations;
    match (
        name,
        country,
        email,
        confirm_email,
        discord_username,
        keyboard_kit_name,
        plate_choice,
        layout,
        stabilizers,
        switches,
        switches_lubing,
        providing_keycaps,
        return_shipping_insurance,
        additional_notes,
        agreed_to_terms,
    ) {
        (
            Some(name),
            Some(country),
            Some(email),
            Some(_),
            Some(discord_username),
            Some(keyboard_kit_name),
            Some(plate_choice),
            Some(layout),
            Some(stabilizers),
            Some(switches),
            Some(switches_lubing),
            Some(providing_keycaps),
            Some(return_shipping_insurance),
            Some(additional_notes),
            Some(agreed_to_terms),
        ) if violations.is_empty() => Ok(CommissionRequest {
            name,
            country,
            email,
            discord_username,
            keyboard_kit_name,
            plate_choice,
            layout,
            stabilizers,
            switches,
            switches_lubing,
            providing_keycaps,
            return_shipping_insurance,
            additional_notes,
            agreed_to_terms,
        }),
        _ => {
            debug!(violations = violations.len(), "Commission payload rejected");
            Err(violations)
        }
    }
}

/// Walks a JSON object, collecting violations as fields are read.
struct Fields<'a> {
    object: &'a Map<String, Value>,
    violations: Vec<FieldViolation>,
}

impl<'a> Fields<'a> {
    fn reject(&mut self, field: &str, code: ViolationCode, message: impl Into<String>) {
        self.violations.push(FieldViolation::new(field, code, message));
    }

    fn string(&mut self, field: &str) -> Option<&'a str> {
        let object = self.object;
        match object.get(field) {
            Some(Value::String(s)) => Some(s.as_str()),
            Some(other) => {
                let message = format!("Expected string, received {}", json_type(other));
                self.reject(field, ViolationCode::InvalidType, message);
                None
            }
            None => {
                self.reject(field, ViolationCode::InvalidType, "Required");
                None
            }
        }
    }

    fn required_text(&mut self, field: &str, message: &str) -> Option<String> {
        let value = self.string(field)?.trim();
        if value.is_empty() {
            self.reject(field, ViolationCode::TooSmall, message);
            return None;
        }
        Some(value.to_string())
    }

    /// Checked exactly as sent; surrounding whitespace makes it invalid.
    fn email(&mut self, field: &str) -> Option<String> {
        let value = self.string(field)?;
        if !is_valid_email(value) {
            self.reject(field, ViolationCode::InvalidString, "Invalid email address");
            return None;
        }
        Some(value.to_string())
    }

    fn choice<T: Choice>(&mut self, field: &str) -> Option<T> {
        let value = self.string(field)?;
        let parsed = T::from_label(value);
        if parsed.is_none() {
            let expected = T::LABELS
                .iter()
                .map(|l| format!("'{l}'"))
                .collect::<Vec<_>>()
                .join(" | ");
            let message = format!("Invalid enum value. Expected {expected}, received '{value}'");
            self.reject(field, ViolationCode::InvalidEnumValue, message);
        }
        parsed
    }

    /// Absent, null and blank all mean "no notes".
    fn optional_text(&mut self, field: &str) -> Option<Option<String>> {
        let object = self.object;
        match object.get(field) {
            None | Some(Value::Null) => Some(None),
            Some(Value::String(s)) => {
                let trimmed = s.trim();
                Some((!trimmed.is_empty()).then(|| trimmed.to_string()))
            }
            Some(other) => {
                let message = format!("Expected string, received {}", json_type(other));
                self.reject(field, ViolationCode::InvalidType, message);
                None
            }
        }
    }

    fn accepted(&mut self, field: &str, message: &str) -> Option<bool> {
        let object = self.object;
        match object.get(field) {
            Some(Value::Bool(true)) => Some(true),
            Some(Value::Bool(false)) => {
                self.reject(field, ViolationCode::Custom, message);
                None
            }
            Some(other) => {
                let message = format!("Expected boolean, received {}", json_type(other));
                self.reject(field, ViolationCode::InvalidType, message);
                None
            }
            None => {
                self.reject(field, ViolationCode::InvalidType, "Required");
                None
            }
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Syntactic email check.
///
/// On top of the RFC 5322 grammar from `validator`, the local part may not
/// start or end with a dot or hold `..`, and the domain needs an alphabetic
/// top-level label of at least two letters.
pub fn is_valid_email(email: &str) -> bool {
    if !validate_email(email) {
        return false;
    }

    let Some((local, domain)) = email.rsplit_once('@') else {
        return false;
    };

    let local_ok = !local.starts_with('.') && !local.ends_with('.') && !local.contains("..");
    let tld_ok = domain
        .rsplit_once('.')
        .is_some_and(|(_, tld)| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()));

    local_ok && tld_ok
}
