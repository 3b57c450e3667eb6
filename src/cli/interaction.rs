//! Contract between the booking session loop and whatever collects input.

use std::time::Duration;

use crate::core::notifications::Notification;
use crate::core::wizard::WizardStep;
use crate::domain::{BookingField, PaymentMethod, ServiceType, SpecialNeed, VehicleType};
use crate::errors::BookingError;

/// How the user answered a field prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResponse {
    /// Raw text to parse into the field.
    Value(String),
    /// Keep the current value.
    Keep,
    /// Return to the previous field, or the previous step from the first field.
    Back,
    /// Leave the wizard; the draft stays saved.
    Cancel,
}

/// Answer on the confirmation screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationResponse {
    Submit,
    Back,
    Cancel,
}

/// Kind of input widget a field calls for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldInput {
    Text,
    Flag,
    /// Pick one `(key, label)`; answer with its 1-based index.
    Choice(Vec<(&'static str, String)>),
    /// Pick any subset; answer with comma-separated keys.
    Multi(Vec<(&'static str, String)>),
}

/// Picker line for a service: name, subtitle and pitch.
pub fn service_option_label(service: ServiceType) -> String {
    format!(
        "{} ({}): {}",
        service.label(),
        service.subtitle(),
        service.description()
    )
}

impl FieldInput {
    pub fn for_field(field: BookingField) -> Self {
        match field {
            BookingField::IsCompany | BookingField::ReturnTrip | BookingField::AcceptTerms => {
                FieldInput::Flag
            }
            BookingField::ServiceType => FieldInput::Choice(
                ServiceType::ALL
                    .iter()
                    .map(|s| (s.key(), service_option_label(*s)))
                    .collect(),
            ),
            BookingField::VehicleType => FieldInput::Choice(
                VehicleType::ALL
                    .iter()
                    .map(|v| (v.key(), v.label().to_string()))
                    .collect(),
            ),
            BookingField::PaymentMethod => FieldInput::Choice(
                PaymentMethod::ALL
                    .iter()
                    .map(|p| (p.key(), p.label().to_string()))
                    .collect(),
            ),
            BookingField::SpecialNeeds => FieldInput::Multi(
                SpecialNeed::ALL
                    .iter()
                    .map(|need| (need.key(), need.label().to_string()))
                    .collect(),
            ),
            _ => FieldInput::Text,
        }
    }
}

/// Everything an interaction needs to render one field prompt.
#[derive(Debug, Clone)]
pub struct FieldPrompt<'a> {
    pub step: WizardStep,
    pub field: BookingField,
    pub input: FieldInput,
    /// Current value as editable text.
    pub current: &'a str,
    /// Inline error from the last failed attempt on this field.
    pub error: Option<&'a str>,
    /// Position of the field among the visible fields of the step.
    pub index: usize,
}

pub trait BookingInteraction {
    fn prompt_field(&mut self, prompt: &FieldPrompt<'_>) -> Result<PromptResponse, BookingError>;

    /// Shows the rendered booking and asks whether to send it.
    fn confirm(&mut self, summary: &[String]) -> Result<ConfirmationResponse, BookingError>;

    /// Blocks while the estimate is being calculated.
    fn wait(&mut self, duration: Duration);

    fn notify(&mut self, notification: &Notification);

    fn step_started(&mut self, _step: WizardStep) {}

    fn estimate_ready(&mut self, _value: f64) {}
}
