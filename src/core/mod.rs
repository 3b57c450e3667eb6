//! Booking logic: validation, pricing, the handoff message, and the wizard
//! state machine that ties them together.

pub mod documents;
pub mod message;
pub mod notifications;
pub mod pricing;
pub mod time;
pub mod validation;
pub mod wizard;

pub use message::LinkOpener;
pub use time::{Clock, ManualClock, SystemClock};
pub use wizard::{BookingWizard, WizardStep};
