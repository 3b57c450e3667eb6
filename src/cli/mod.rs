//! Terminal front end for the booking wizard.

pub mod interaction;
pub mod opener;
pub mod output;
pub mod prompts;
pub mod session;

pub use interaction::{BookingInteraction, ConfirmationResponse, FieldPrompt, PromptResponse};
pub use opener::PrintLinkOpener;
pub use prompts::DialoguerInteraction;
pub use session::{BookingSession, SessionOutcome};
