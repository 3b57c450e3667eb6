//! Field-by-field loop that drives a [`BookingWizard`] through an interaction.

use crate::cli::interaction::{
    BookingInteraction, ConfirmationResponse, FieldInput, FieldPrompt, PromptResponse,
};
use crate::core::message::{render_booking_message, LinkOpener};
use crate::core::wizard::{BookingWizard, WizardStep};
use crate::domain::{BookingDraft, BookingField, FieldChange};
use crate::errors::BookingError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Booking sent; carries the deep link that was opened.
    Submitted(String),
    /// User left early. The draft remains in the store.
    Saved,
}

enum StepFlow {
    Done,
    Back,
    Cancel,
}

/// Fields of `step` shown for the draft as it is now.
pub fn visible_fields(draft: &BookingDraft, step: WizardStep) -> Vec<BookingField> {
    step.fields()
        .iter()
        .copied()
        .filter(|field| match field {
            BookingField::CompanyName | BookingField::Cnpj => draft.is_company,
            BookingField::ReturnDate | BookingField::ReturnTime => draft.return_trip,
            _ => true,
        })
        .collect()
}

fn step_of(field: BookingField) -> WizardStep {
    WizardStep::ALL
        .into_iter()
        .find(|step| step.fields().contains(&field))
        .unwrap_or(WizardStep::PersonalInfo)
}

pub struct BookingSession<'w> {
    wizard: &'w mut BookingWizard,
}

impl<'w> BookingSession<'w> {
    pub fn new(wizard: &'w mut BookingWizard) -> Self {
        Self { wizard }
    }

    /// Runs until the booking is sent or the user leaves.
    pub fn run(
        &mut self,
        interaction: &mut dyn BookingInteraction,
        opener: &dyn LinkOpener,
    ) -> Result<SessionOutcome, BookingError> {
        loop {
            let step = self.wizard.step();
            interaction.step_started(step);
            match self.fill_step(step, interaction)? {
                StepFlow::Done => {}
                StepFlow::Back => {
                    self.wizard.back();
                    continue;
                }
                StepFlow::Cancel => return Ok(self.leave()),
            }

            if !step.is_last() {
                if self.wizard.next().is_ok() && self.wizard.is_calculating() {
                    interaction.wait(self.wizard.config().pricing_delay());
                    if let Some(value) = self.wizard.poll_pricing() {
                        interaction.estimate_ready(value);
                    }
                }
                self.flush(interaction);
                continue;
            }

            let summary: Vec<String> = render_booking_message(self.wizard.draft())
                .lines()
                .map(str::to_string)
                .collect();
            match interaction.confirm(&summary)? {
                ConfirmationResponse::Submit => {}
                ConfirmationResponse::Back => continue,
                ConfirmationResponse::Cancel => return Ok(self.leave()),
            }

            let result = self.wizard.submit(opener);
            self.flush(interaction);
            match result {
                Ok(link) => return Ok(SessionOutcome::Submitted(link)),
                Err(BookingError::Validation(report)) => {
                    let target = report.first().map(|first| step_of(first.field));
                    if let Some(target) = target.filter(|target| *target < step) {
                        self.wizard.jump_to(target)?;
                    }
                }
                Err(BookingError::TermsNotAccepted) | Err(BookingError::LinkOpen(_)) => {}
                Err(other) => return Err(other),
            }
        }
    }

    fn leave(&mut self) -> SessionOutcome {
        self.wizard.teardown();
        tracing::info!("booking session left; draft kept");
        SessionOutcome::Saved
    }

    fn flush(&mut self, interaction: &mut dyn BookingInteraction) {
        for notification in self.wizard.take_notifications() {
            interaction.notify(&notification);
        }
    }

    fn fill_step(
        &mut self,
        step: WizardStep,
        interaction: &mut dyn BookingInteraction,
    ) -> Result<StepFlow, BookingError> {
        let mut index = 0;
        let mut parse_error: Option<(BookingField, String)> = None;
        loop {
            let fields = visible_fields(self.wizard.draft(), step);
            let Some(&field) = fields.get(index) else {
                return Ok(StepFlow::Done);
            };
            let current = field.current_text(self.wizard.draft());
            let error = match &parse_error {
                Some((failed, message)) if *failed == field => Some(message.clone()),
                _ => self.wizard.inline_error(field).map(str::to_string),
            };
            let prompt = FieldPrompt {
                step,
                field,
                input: FieldInput::for_field(field),
                current: &current,
                error: error.as_deref(),
                index,
            };
            match interaction.prompt_field(&prompt)? {
                PromptResponse::Value(raw) => match FieldChange::parse(field, &raw) {
                    Ok(change) => {
                        self.wizard.apply(change);
                        parse_error = None;
                        index += 1;
                    }
                    Err(BookingError::InvalidInput { message, .. }) => {
                        parse_error = Some((field, message));
                    }
                    Err(other) => return Err(other),
                },
                PromptResponse::Keep => {
                    parse_error = None;
                    index += 1;
                }
                PromptResponse::Back if index == 0 => return Ok(StepFlow::Back),
                PromptResponse::Back => {
                    parse_error = None;
                    index -= 1;
                }
                PromptResponse::Cancel => return Ok(StepFlow::Cancel),
            }
        }
    }
}
