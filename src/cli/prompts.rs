//! Terminal prompts backed by `dialoguer`.

use std::thread;
use std::time::Duration;

use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect, Select};

use crate::cli::interaction::{
    BookingInteraction, ConfirmationResponse, FieldInput, FieldPrompt, PromptResponse,
};
use crate::cli::output;
use crate::core::notifications::Notification;
use crate::core::wizard::WizardStep;
use crate::currency::format_brl;
use crate::errors::BookingError;

/// Typed into a text prompt to go back one field.
pub const BACK_TOKEN: &str = "<";
/// Typed into a text prompt to leave the wizard.
pub const QUIT_TOKEN: &str = ":q";

pub struct DialoguerInteraction {
    theme: ColorfulTheme,
}

impl Default for DialoguerInteraction {
    fn default() -> Self {
        Self::new()
    }
}

impl DialoguerInteraction {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    fn prompt_text(&self, prompt: &FieldPrompt<'_>) -> Result<PromptResponse, BookingError> {
        let raw = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt.field.label())
            .with_initial_text(prompt.current)
            .allow_empty(true)
            .interact_text()?;
        Ok(interpret_text(&raw, prompt.current))
    }

    fn prompt_flag(&self, prompt: &FieldPrompt<'_>) -> Result<PromptResponse, BookingError> {
        let current = matches!(prompt.current, "sim");
        let answer = Confirm::with_theme(&self.theme)
            .with_prompt(prompt.field.label())
            .default(current)
            .interact_opt()?;
        Ok(match answer {
            Some(true) => PromptResponse::Value("sim".into()),
            Some(false) => PromptResponse::Value("não".into()),
            None => PromptResponse::Back,
        })
    }

    fn prompt_choice(
        &self,
        prompt: &FieldPrompt<'_>,
        options: &[(&'static str, String)],
    ) -> Result<PromptResponse, BookingError> {
        let default = options
            .iter()
            .position(|(key, _)| *key == prompt.current)
            .unwrap_or(0);
        let labels: Vec<&str> = options.iter().map(|(_, label)| label.as_str()).collect();
        let selection = Select::with_theme(&self.theme)
            .with_prompt(prompt.field.label())
            .items(&labels)
            .default(default)
            .interact_opt()?;
        Ok(match selection {
            Some(index) => PromptResponse::Value((index + 1).to_string()),
            None => PromptResponse::Back,
        })
    }

    fn prompt_multi(
        &self,
        prompt: &FieldPrompt<'_>,
        options: &[(&'static str, String)],
    ) -> Result<PromptResponse, BookingError> {
        let active: Vec<&str> = prompt.current.split(',').map(str::trim).collect();
        let defaults: Vec<bool> = options
            .iter()
            .map(|(key, _)| active.contains(key))
            .collect();
        let labels: Vec<&str> = options.iter().map(|(_, label)| label.as_str()).collect();
        let selection = MultiSelect::with_theme(&self.theme)
            .with_prompt(prompt.field.label())
            .items(&labels)
            .defaults(&defaults)
            .interact_opt()?;
        Ok(match selection {
            Some(indices) => PromptResponse::Value(
                indices
                    .into_iter()
                    .filter_map(|i| options.get(i).map(|(key, _)| *key))
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            None => PromptResponse::Back,
        })
    }
}

/// Maps typed text onto a prompt response.
pub fn interpret_text(raw: &str, current: &str) -> PromptResponse {
    let trimmed = raw.trim();
    match trimmed {
        BACK_TOKEN => PromptResponse::Back,
        QUIT_TOKEN => PromptResponse::Cancel,
        _ if trimmed == current.trim() => PromptResponse::Keep,
        _ => PromptResponse::Value(trimmed.to_string()),
    }
}

impl BookingInteraction for DialoguerInteraction {
    fn prompt_field(&mut self, prompt: &FieldPrompt<'_>) -> Result<PromptResponse, BookingError> {
        if let Some(error) = prompt.error {
            output::error(error);
        }
        match &prompt.input {
            FieldInput::Text => self.prompt_text(prompt),
            FieldInput::Flag => self.prompt_flag(prompt),
            FieldInput::Choice(options) => self.prompt_choice(prompt, options),
            FieldInput::Multi(options) => self.prompt_multi(prompt, options),
        }
    }

    fn confirm(&mut self, summary: &[String]) -> Result<ConfirmationResponse, BookingError> {
        output::separator();
        for line in summary {
            println!("{line}");
        }
        output::separator();
        let options = ["Enviar reserva", "Voltar e editar", "Sair e salvar rascunho"];
        let selection = Select::with_theme(&self.theme)
            .with_prompt("Confirmar reserva?")
            .items(&options)
            .default(0)
            .interact_opt()?;
        Ok(match selection {
            Some(0) => ConfirmationResponse::Submit,
            Some(1) | None => ConfirmationResponse::Back,
            Some(_) => ConfirmationResponse::Cancel,
        })
    }

    fn wait(&mut self, duration: Duration) {
        output::info("Calculando estimativa...");
        thread::sleep(duration);
    }

    fn notify(&mut self, notification: &Notification) {
        output::notification(notification);
    }

    fn step_started(&mut self, step: WizardStep) {
        output::section(format!("Passo {step}"));
        if step.is_first() {
            output::info(format!(
                "Digite `{BACK_TOKEN}` para voltar um campo ou `{QUIT_TOKEN}` para sair."
            ));
        }
    }

    fn estimate_ready(&mut self, value: f64) {
        output::success(format!("Valor estimado: {}", format_brl(value)));
    }
}
