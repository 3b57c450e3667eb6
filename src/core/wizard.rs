//! The four-step booking state machine.
//!
//! [`BookingWizard`] owns the draft. Every edit goes through
//! [`BookingWizard::apply`], which persists the full snapshot afterwards.
//! Forward moves are gated on the current step's validation; the price
//! estimate is computed when leaving the trip step and revealed after the
//! configured delay.

use std::fmt;
use std::sync::Arc;

use chrono::Duration;

use crate::config::BookingConfig;
use crate::core::message::{render_booking_message, whatsapp_link, LinkOpener};
use crate::core::notifications::{
    Notification, NotificationCenter, NotificationKind, SUBMIT_FAILURE, SUBMIT_SUCCESS,
};
use crate::core::pricing::{estimate_price, PricingTimer};
use crate::core::time::Clock;
use crate::core::validation::{
    validate_all, validate_step, ValidationContext, ValidationReport, MSG_ACCEPT_TERMS,
};
use crate::domain::{snapshot, BookingDraft, BookingField, FieldChange};
use crate::errors::BookingError;
use crate::storage::SnapshotStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WizardStep {
    PersonalInfo = 1,
    TripDetails = 2,
    SpecialNeeds = 3,
    PaymentConfirm = 4,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::PersonalInfo,
        WizardStep::TripDetails,
        WizardStep::SpecialNeeds,
        WizardStep::PaymentConfirm,
    ];

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            1 => Some(WizardStep::PersonalInfo),
            2 => Some(WizardStep::TripDetails),
            3 => Some(WizardStep::SpecialNeeds),
            4 => Some(WizardStep::PaymentConfirm),
            _ => None,
        }
    }

    /// Following step, saturating at the last one.
    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1).unwrap_or(WizardStep::PaymentConfirm)
    }

    /// Preceding step, saturating at the first one.
    pub fn previous(self) -> Self {
        Self::from_index(self.index().saturating_sub(1)).unwrap_or(WizardStep::PersonalInfo)
    }

    pub fn is_first(self) -> bool {
        self == WizardStep::PersonalInfo
    }

    pub fn is_last(self) -> bool {
        self == WizardStep::PaymentConfirm
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::PersonalInfo => "Dados Pessoais",
            WizardStep::TripDetails => "Detalhes da Viagem",
            WizardStep::SpecialNeeds => "Necessidades Especiais",
            WizardStep::PaymentConfirm => "Confirmação",
        }
    }

    /// Fields edited on this step, in declaration order.
    pub fn fields(self) -> &'static [BookingField] {
        match self {
            WizardStep::PersonalInfo => &[
                BookingField::FullName,
                BookingField::Email,
                BookingField::Phone,
                BookingField::Cpf,
                BookingField::IsCompany,
                BookingField::CompanyName,
                BookingField::Cnpj,
            ],
            WizardStep::TripDetails => &[
                BookingField::ServiceType,
                BookingField::PickupAddress,
                BookingField::DestinationAddress,
                BookingField::TripDate,
                BookingField::TripTime,
                BookingField::ReturnTrip,
                BookingField::ReturnDate,
                BookingField::ReturnTime,
            ],
            WizardStep::SpecialNeeds => &[
                BookingField::Passengers,
                BookingField::VehicleType,
                BookingField::SpecialNeeds,
                BookingField::Observations,
            ],
            WizardStep::PaymentConfirm => {
                &[BookingField::PaymentMethod, BookingField::AcceptTerms]
            }
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/4 {}", self.index(), self.title())
    }
}

/// A booking attempt in progress.
pub struct BookingWizard {
    store: Box<dyn SnapshotStore>,
    clock: Arc<dyn Clock>,
    config: BookingConfig,
    draft: BookingDraft,
    step: WizardStep,
    errors: ValidationReport,
    notifications: NotificationCenter,
    pricing: PricingTimer,
    mounted: bool,
}

impl fmt::Debug for BookingWizard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BookingWizard")
            .field("step", &self.step)
            .field("draft", &self.draft)
            .field("calculating", &self.pricing.is_pending())
            .field("mounted", &self.mounted)
            .finish()
    }
}

fn chrono_duration(value: std::time::Duration) -> Duration {
    Duration::from_std(value).unwrap_or_else(|_| Duration::zero())
}

impl BookingWizard {
    /// Creates the wizard and seeds the draft from the stored snapshot, if any.
    ///
    /// A missing, unreadable, or corrupt snapshot leaves the defaults in
    /// place. The wizard always starts on the first step.
    pub fn mount(
        store: Box<dyn SnapshotStore>,
        clock: Arc<dyn Clock>,
        config: BookingConfig,
    ) -> Self {
        let notifications = NotificationCenter::new(chrono_duration(config.notification_ttl()));
        let mut wizard = Self {
            store,
            clock,
            config,
            draft: BookingDraft::default(),
            step: WizardStep::PersonalInfo,
            errors: ValidationReport::default(),
            notifications,
            pricing: PricingTimer::new(),
            mounted: true,
        };
        wizard.restore();
        wizard
    }

    fn restore(&mut self) {
        let key = self.config.storage_key.as_str();
        match self.store.get(key) {
            Ok(Some(raw)) => match snapshot::decode(&raw) {
                Ok(draft) => {
                    tracing::info!(key, "restored saved booking draft");
                    self.draft = draft;
                }
                Err(err) => {
                    tracing::warn!(key, error = %err, "discarding unreadable booking draft");
                }
            },
            Ok(None) => tracing::debug!(key, "no saved booking draft"),
            Err(err) => tracing::warn!(key, error = %err, "could not read saved booking draft"),
        }
    }

    fn persist(&self) {
        let key = self.config.storage_key.as_str();
        let result = snapshot::encode(&self.draft, self.step.index())
            .and_then(|raw| self.store.set(key, &raw));
        if let Err(err) = result {
            tracing::warn!(key, error = %err, "failed to save booking draft");
        }
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn config(&self) -> &BookingConfig {
        &self.config
    }

    /// Errors from the last failed validation, for inline display.
    pub fn errors(&self) -> &ValidationReport {
        &self.errors
    }

    pub fn inline_error(&self, field: BookingField) -> Option<&str> {
        self.errors.message_for(field)
    }

    /// Live notifications; expired ones are dropped.
    pub fn notifications(&mut self) -> &[Notification] {
        let now = self.clock.now();
        self.notifications.active(now)
    }

    /// Hands every queued notification to the caller.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain()
    }

    pub fn validation_context(&self) -> ValidationContext {
        ValidationContext::new(self.clock.today()).strict(self.config.strict_documents)
    }

    /// Applies one edit and saves the snapshot.
    pub fn apply(&mut self, change: FieldChange) {
        let field = change.field();
        change.apply_to(&mut self.draft);
        tracing::trace!(%field, "field updated");
        self.persist();
    }

    fn notify(&mut self, kind: NotificationKind, message: impl Into<String>) {
        let now = self.clock.now();
        self.notifications.push(kind, message, now);
    }

    fn reject(&mut self, report: ValidationReport) -> ValidationReport {
        if let Some(first) = report.first() {
            let message = first.message.clone();
            tracing::info!(step = %self.step, field = %first.field, %message, "validation failed");
            self.notify(NotificationKind::Error, message);
        }
        self.errors = report.clone();
        report
    }

    /// Validates the current step and moves forward.
    ///
    /// Leaving the trip step starts the price estimate. On the last step
    /// this does nothing; only [`submit`](Self::submit) applies there.
    pub fn next(&mut self) -> Result<WizardStep, ValidationReport> {
        if self.step.is_last() {
            return Ok(self.step);
        }
        let ctx = self.validation_context();
        if let Err(report) = validate_step(&self.draft, self.step, &ctx) {
            return Err(self.reject(report));
        }
        self.errors = ValidationReport::default();
        if self.step == WizardStep::TripDetails {
            self.start_pricing();
        }
        let from = self.step;
        self.step = self.step.next();
        tracing::debug!(%from, to = %self.step, "advanced");
        Ok(self.step)
    }

    /// Moves one step back without validation.
    pub fn back(&mut self) -> WizardStep {
        self.step = self.step.previous();
        self.step
    }

    /// Returns to an already completed step, strictly before the current one.
    pub fn jump_to(&mut self, target: WizardStep) -> Result<WizardStep, BookingError> {
        if target >= self.step {
            return Err(BookingError::InvalidJump {
                from: self.step,
                to: target,
            });
        }
        self.step = target;
        Ok(self.step)
    }

    fn start_pricing(&mut self) {
        let value = estimate_price(
            self.draft.vehicle_type,
            self.draft.service_type,
            self.draft.return_trip,
        );
        let delay = chrono_duration(self.config.pricing_delay());
        self.draft.estimated_price = None;
        self.pricing.start(value, self.clock.now(), delay);
        tracing::info!(
            vehicle = self.draft.vehicle_type.key(),
            service = self.draft.service_type.key(),
            return_trip = self.draft.return_trip,
            "calculating estimate"
        );
    }

    pub fn is_calculating(&self) -> bool {
        self.mounted && self.pricing.is_pending()
    }

    /// Reveals the estimate once the delay has elapsed. No-op after teardown.
    pub fn poll_pricing(&mut self) -> Option<f64> {
        if !self.mounted {
            return None;
        }
        let value = self.pricing.poll(self.clock.now())?;
        self.draft.estimated_price = Some(value);
        tracing::info!(estimate = value, "estimate ready");
        self.persist();
        Some(value)
    }

    /// Detaches the wizard. A pending estimate is dropped unseen.
    pub fn teardown(&mut self) {
        self.pricing.cancel();
        self.mounted = false;
        tracing::debug!("wizard torn down");
    }

    /// Sends the booking.
    ///
    /// Requires the last step and accepted terms, then validates the whole
    /// draft. On success the deep link is opened, the snapshot is deleted,
    /// and the wizard starts over. Any failure keeps the draft intact.
    pub fn submit(&mut self, opener: &dyn LinkOpener) -> Result<String, BookingError> {
        if !self.step.is_last() {
            return Err(BookingError::NotOnFinalStep(self.step));
        }
        if !self.draft.accept_terms {
            tracing::info!("submission blocked: terms not accepted");
            self.notify(NotificationKind::Error, MSG_ACCEPT_TERMS);
            return Err(BookingError::TermsNotAccepted);
        }
        let ctx = self.validation_context();
        if let Err(report) = validate_all(&self.draft, &ctx) {
            return Err(self.reject(report).into());
        }
        self.errors = ValidationReport::default();
        self.poll_pricing();

        let message = render_booking_message(&self.draft);
        let link = whatsapp_link(&self.config.whatsapp_number, &message);
        if let Err(err) = opener.open(&link) {
            tracing::error!(error = %err, "failed to open booking link");
            self.notify(NotificationKind::Error, SUBMIT_FAILURE);
            return Err(err);
        }

        let key = self.config.storage_key.clone();
        if let Err(err) = self.store.remove(&key) {
            tracing::warn!(key = %key, error = %err, "failed to clear saved booking draft");
        }
        self.pricing.cancel();
        self.draft = BookingDraft::default();
        self.step = WizardStep::PersonalInfo;
        tracing::info!("booking submitted");
        self.notify(NotificationKind::Success, SUBMIT_SUCCESS);
        Ok(link)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use chrono::NaiveDate;

    use super::*;
    use crate::core::time::ManualClock;
    use crate::domain::TimeOfDay;
    use crate::storage::MemorySnapshotStore;

    const KEY: &str = "seooBookingFormData";

    #[derive(Default)]
    struct RecordingOpener {
        opened: RefCell<Vec<String>>,
    }

    impl LinkOpener for RecordingOpener {
        fn open(&self, url: &str) -> Result<(), BookingError> {
            self.opened.borrow_mut().push(url.to_string());
            Ok(())
        }
    }

    struct FailingOpener;

    impl LinkOpener for FailingOpener {
        fn open(&self, _url: &str) -> Result<(), BookingError> {
            Err(BookingError::LinkOpen("no handler".into()))
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn setup() -> (BookingWizard, Arc<MemorySnapshotStore>, Arc<ManualClock>) {
        setup_with(MemorySnapshotStore::new())
    }

    fn setup_with(
        store: MemorySnapshotStore,
    ) -> (BookingWizard, Arc<MemorySnapshotStore>, Arc<ManualClock>) {
        let store = Arc::new(store);
        let clock = Arc::new(ManualClock::at_date(today()));
        let wizard = BookingWizard::mount(
            Box::new(store.clone()),
            clock.clone(),
            BookingConfig::default(),
        );
        (wizard, store, clock)
    }

    fn fill_personal(wizard: &mut BookingWizard) {
        wizard.apply(FieldChange::FullName("Maria Silva".into()));
        wizard.apply(FieldChange::Email("maria@x.com".into()));
        wizard.apply(FieldChange::Phone("(11) 99999-9999".into()));
    }

    fn fill_trip(wizard: &mut BookingWizard) {
        wizard.apply(FieldChange::PickupAddress("Av. Paulista, 1000".into()));
        wizard.apply(FieldChange::DestinationAddress("Aeroporto de Guarulhos".into()));
        wizard.apply(FieldChange::TripDate(today().succ_opt()));
        wizard.apply(FieldChange::TripTime(TimeOfDay::new(14, 0)));
    }

    #[test]
    fn step_navigation_saturates() {
        assert_eq!(WizardStep::PersonalInfo.previous(), WizardStep::PersonalInfo);
        assert_eq!(WizardStep::PaymentConfirm.next(), WizardStep::PaymentConfirm);
        assert_eq!(WizardStep::from_index(0), None);
        assert_eq!(WizardStep::SpecialNeeds.to_string(), "3/4 Necessidades Especiais");
    }

    #[test]
    fn back_on_first_step_is_noop() {
        let (mut wizard, _, _) = setup();
        assert_eq!(wizard.back(), WizardStep::PersonalInfo);
    }

    #[test]
    fn failed_next_stays_and_notifies_first_error() {
        let (mut wizard, _, _) = setup();
        wizard.apply(FieldChange::FullName("Maria Silva".into()));
        let report = wizard.next().unwrap_err();
        assert_eq!(report.first().map(|e| e.field), Some(BookingField::Email));
        assert_eq!(wizard.step(), WizardStep::PersonalInfo);
        assert_eq!(wizard.inline_error(BookingField::Phone), Some("Formato: (11) 99999-9999"));
        let notes = wizard.notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].kind, NotificationKind::Error);
        assert_eq!(notes[0].message, "Email inválido");
    }

    #[test]
    fn every_edit_is_persisted() {
        let (mut wizard, store, _) = setup();
        wizard.apply(FieldChange::FullName("Ana".into()));
        let saved = store.get(KEY).unwrap().unwrap();
        assert!(saved.contains("\"fullName\":\"Ana\""));
        assert!(saved.contains("\"currentStep\":1"));
    }

    #[test]
    fn pricing_reveals_after_delay_and_next_on_last_step_is_noop() {
        let (mut wizard, store, clock) = setup();
        fill_personal(&mut wizard);
        assert_eq!(wizard.next().unwrap(), WizardStep::TripDetails);
        fill_trip(&mut wizard);
        assert_eq!(wizard.next().unwrap(), WizardStep::SpecialNeeds);

        assert!(wizard.is_calculating());
        assert_eq!(wizard.poll_pricing(), None);
        clock.advance(Duration::milliseconds(1500));
        assert_eq!(wizard.poll_pricing(), Some(180.0 * 1.3 * 1.2));
        assert!(!wizard.is_calculating());
        assert!(store.get(KEY).unwrap().unwrap().contains("estimatedPrice"));

        assert_eq!(wizard.next().unwrap(), WizardStep::PaymentConfirm);
        assert_eq!(wizard.next().unwrap(), WizardStep::PaymentConfirm);
    }

    #[test]
    fn teardown_drops_pending_estimate() {
        let (mut wizard, _, clock) = setup();
        fill_personal(&mut wizard);
        wizard.next().unwrap();
        fill_trip(&mut wizard);
        wizard.next().unwrap();
        wizard.teardown();
        clock.advance(Duration::seconds(2));
        assert_eq!(wizard.poll_pricing(), None);
        assert_eq!(wizard.draft().estimated_price, None);
        assert!(!wizard.is_calculating());
    }

    #[test]
    fn jumps_only_backwards() {
        let (mut wizard, _, _) = setup();
        fill_personal(&mut wizard);
        wizard.next().unwrap();
        let err = wizard.jump_to(WizardStep::SpecialNeeds).unwrap_err();
        assert!(matches!(err, BookingError::InvalidJump { .. }));
        let err = wizard.jump_to(WizardStep::TripDetails).unwrap_err();
        assert!(matches!(
            err,
            BookingError::InvalidJump {
                from: WizardStep::TripDetails,
                to: WizardStep::TripDetails
            }
        ));
        assert_eq!(wizard.step(), WizardStep::TripDetails);
        assert_eq!(wizard.jump_to(WizardStep::PersonalInfo).unwrap(), WizardStep::PersonalInfo);
    }

    fn at_confirmation() -> (BookingWizard, Arc<MemorySnapshotStore>, Arc<ManualClock>) {
        let (mut wizard, store, clock) = setup();
        fill_personal(&mut wizard);
        wizard.next().unwrap();
        fill_trip(&mut wizard);
        wizard.next().unwrap();
        wizard.next().unwrap();
        (wizard, store, clock)
    }

    #[test]
    fn submit_requires_terms() {
        let (mut wizard, store, _) = at_confirmation();
        let opener = RecordingOpener::default();
        let err = wizard.submit(&opener).unwrap_err();
        assert!(matches!(err, BookingError::TermsNotAccepted));
        assert!(opener.opened.borrow().is_empty());
        assert!(store.get(KEY).unwrap().is_some());
        assert_eq!(wizard.step(), WizardStep::PaymentConfirm);
    }

    #[test]
    fn submit_with_invalid_draft_reports_first_field_and_keeps_state() {
        let (mut wizard, store, clock) = at_confirmation();
        wizard.apply(FieldChange::Cpf("123".into()));
        wizard.apply(FieldChange::AcceptTerms(true));
        clock.advance(Duration::days(3));
        let opener = RecordingOpener::default();

        let err = wizard.submit(&opener).unwrap_err();

        let BookingError::Validation(report) = err else {
            panic!("expected a validation failure, got {err:?}");
        };
        assert_eq!(report.len(), 2);
        assert_eq!(report.first().map(|e| e.field), Some(BookingField::Cpf));
        assert_eq!(
            report.message_for(BookingField::TripDate),
            Some("A data não pode estar no passado")
        );
        assert!(opener.opened.borrow().is_empty());
        assert!(store.get(KEY).unwrap().is_some());
        assert_eq!(wizard.step(), WizardStep::PaymentConfirm);
        assert_eq!(wizard.draft().full_name, "Maria Silva");
        assert_eq!(wizard.inline_error(BookingField::Cpf), Some("CPF inválido"));
        let notes = wizard.take_notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].kind, NotificationKind::Error);
        assert_eq!(notes[0].message, "CPF inválido");
    }

    #[test]
    fn submit_only_from_last_step() {
        let (mut wizard, _, _) = setup();
        let err = wizard.submit(&RecordingOpener::default()).unwrap_err();
        assert!(matches!(err, BookingError::NotOnFinalStep(WizardStep::PersonalInfo)));
    }

    #[test]
    fn failed_open_keeps_draft() {
        let (mut wizard, store, _) = at_confirmation();
        wizard.apply(FieldChange::AcceptTerms(true));
        assert!(wizard.submit(&FailingOpener).is_err());
        assert_eq!(wizard.draft().full_name, "Maria Silva");
        assert!(store.get(KEY).unwrap().is_some());
        let notes = wizard.take_notifications();
        assert_eq!(notes.last().map(|n| n.message.as_str()), Some(SUBMIT_FAILURE));
    }

    #[test]
    fn submit_resets_and_clears_snapshot() {
        let (mut wizard, store, clock) = at_confirmation();
        clock.advance(Duration::seconds(2));
        wizard.apply(FieldChange::AcceptTerms(true));
        let opener = RecordingOpener::default();
        let link = wizard.submit(&opener).unwrap();
        assert!(link.starts_with("https://wa.me/5511945164043?text="));
        assert!(link.contains("R%24%20280%2C80"));
        assert_eq!(opener.opened.borrow().as_slice(), &[link.clone()]);
        assert_eq!(store.get(KEY).unwrap(), None);
        assert_eq!(wizard.step(), WizardStep::PersonalInfo);
        assert_eq!(wizard.draft(), &BookingDraft::default());
        let notes = wizard.notifications();
        assert_eq!(notes.last().map(|n| n.kind), Some(NotificationKind::Success));
    }

    #[test]
    fn restore_ignores_corrupt_snapshot() {
        let (wizard, _, _) = setup_with(MemorySnapshotStore::with_entry(KEY, "{not json"));
        assert_eq!(wizard.draft(), &BookingDraft::default());
    }

    #[test]
    fn restore_always_starts_at_first_step() {
        let raw = r#"{"fullName":"Maria Silva","passengers":3,"currentStep":4}"#;
        let (wizard, _, _) = setup_with(MemorySnapshotStore::with_entry(KEY, raw));
        assert_eq!(wizard.step(), WizardStep::PersonalInfo);
        assert_eq!(wizard.draft().full_name, "Maria Silva");
        assert_eq!(wizard.draft().passengers.0, 3);
        assert!(wizard.draft().special_needs.woman_driver);
    }
}
