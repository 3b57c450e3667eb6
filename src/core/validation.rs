//! Two-phase draft validation.
//!
//! Phase one checks each field against its [`Validator`]. Phase two applies
//! the [`ConditionalRule`]s, whose fields only join the checked set while
//! their guard holds, and the cross-field return date refinement.

use std::fmt;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::documents::{validate_cnpj, validate_cpf};
use crate::core::wizard::WizardStep;
use crate::domain::{BookingDraft, BookingField};

// Leading dots and `..` are rejected in `is_email`; `regex` has no lookahead.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[a-z0-9_'+\-.]*[a-z0-9_+\-]@([a-z0-9][a-z0-9\-]*\.)+[a-z]{2,}$")
        .unwrap_or_else(|err| panic!("invalid email pattern: {err}"))
});
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\(\d{2}\)\s9\d{4}-\d{4}$")
        .unwrap_or_else(|err| panic!("invalid phone pattern: {err}"))
});
static CPF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{3}\.\d{3}\.\d{3}-\d{2}$")
        .unwrap_or_else(|err| panic!("invalid cpf pattern: {err}"))
});
static CNPJ_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{2}\.\d{3}\.\d{3}/\d{4}-\d{2}$")
        .unwrap_or_else(|err| panic!("invalid cnpj pattern: {err}"))
});

pub const MSG_FULL_NAME: &str = "Nome completo obrigatório";
pub const MSG_EMAIL: &str = "Email inválido";
pub const MSG_PHONE: &str = "Formato: (11) 99999-9999";
pub const MSG_CPF: &str = "CPF inválido";
pub const MSG_CNPJ: &str = "CNPJ inválido";
pub const MSG_COMPANY_NAME: &str = "Nome da empresa obrigatório";
pub const MSG_CNPJ_REQUIRED: &str = "CNPJ obrigatório";
pub const MSG_PICKUP: &str = "Endereço de embarque obrigatório";
pub const MSG_DESTINATION: &str = "Endereço de destino obrigatório";
pub const MSG_TRIP_DATE: &str = "Data obrigatória";
pub const MSG_TRIP_TIME: &str = "Horário obrigatório";
pub const MSG_PAST_DATE: &str = "A data não pode estar no passado";
pub const MSG_RETURN_DATE: &str = "Data de volta obrigatória";
pub const MSG_RETURN_TIME: &str = "Horário de volta obrigatório";
pub const MSG_RETURN_BEFORE_TRIP: &str = "A data de volta deve ser igual ou posterior à data da viagem";
pub const MSG_PASSENGERS: &str = "Entre 1 e 7 passageiros";
pub const MSG_ACCEPT_TERMS: &str = "Você deve aceitar os termos";

fn is_email(text: &str) -> bool {
    !text.starts_with('.') && !text.contains("..") && EMAIL_RE.is_match(text)
}

/// Inputs that are not part of the draft itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationContext {
    pub today: NaiveDate,
    /// Also verify CPF/CNPJ check digits, not only the digit grouping.
    pub strict_documents: bool,
}

impl ValidationContext {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            strict_documents: false,
        }
    }

    pub fn strict(mut self, strict_documents: bool) -> Self {
        self.strict_documents = strict_documents;
        self
    }
}

/// Per-field rule. Mirrors the shape of a form field validator: each variant
/// checks one property of the field's current text or value.
#[derive(Debug, Clone, PartialEq)]
pub enum Validator {
    None,
    MinLength { min: usize, message: &'static str },
    Email,
    Phone,
    Cpf,
    Cnpj { missing: &'static str },
    RequiredDate { message: &'static str },
    RequiredTime { message: &'static str },
    NotInPast,
    Range { min: u8, max: u8 },
    MustAccept,
    /// Runs the inner rule only when the field holds a value.
    Optional(Box<Validator>),
}

/// What a validator looks at.
enum Subject<'a> {
    Text(&'a str),
    Date(Option<NaiveDate>),
    Time(bool),
    Count(u8),
    Flag(bool),
    Choice,
}

fn subject(draft: &BookingDraft, field: BookingField) -> Subject<'_> {
    match field {
        BookingField::FullName => Subject::Text(&draft.full_name),
        BookingField::Email => Subject::Text(&draft.email),
        BookingField::Phone => Subject::Text(&draft.phone),
        BookingField::Cpf => Subject::Text(&draft.cpf),
        BookingField::CompanyName => Subject::Text(&draft.company_name),
        BookingField::Cnpj => Subject::Text(&draft.cnpj),
        BookingField::PickupAddress => Subject::Text(&draft.pickup_address),
        BookingField::DestinationAddress => Subject::Text(&draft.destination_address),
        BookingField::Observations => Subject::Text(&draft.observations),
        BookingField::TripDate => Subject::Date(draft.trip_date),
        BookingField::ReturnDate => Subject::Date(draft.return_date),
        BookingField::TripTime => Subject::Time(draft.trip_time.is_some()),
        BookingField::ReturnTime => Subject::Time(draft.return_time.is_some()),
        BookingField::Passengers => Subject::Count(draft.passengers.0),
        BookingField::IsCompany => Subject::Flag(draft.is_company),
        BookingField::ReturnTrip => Subject::Flag(draft.return_trip),
        BookingField::AcceptTerms => Subject::Flag(draft.accept_terms),
        BookingField::ServiceType
        | BookingField::VehicleType
        | BookingField::SpecialNeeds
        | BookingField::PaymentMethod => Subject::Choice,
    }
}

impl Validator {
    /// Returns the error message for `field`, or `None` when it passes.
    pub fn check(
        &self,
        draft: &BookingDraft,
        field: BookingField,
        ctx: &ValidationContext,
    ) -> Option<&'static str> {
        let value = subject(draft, field);
        match (self, value) {
            (Validator::None, _) => None,
            (Validator::MinLength { min, message }, Subject::Text(text)) => {
                (text.chars().count() < *min).then_some(*message)
            }
            (Validator::Email, Subject::Text(text)) => {
                (!is_email(text.trim())).then_some(MSG_EMAIL)
            }
            (Validator::Phone, Subject::Text(text)) => {
                (!PHONE_RE.is_match(text.trim())).then_some(MSG_PHONE)
            }
            (Validator::Cpf, Subject::Text(text)) => {
                let text = text.trim();
                let ok = CPF_RE.is_match(text) && (!ctx.strict_documents || validate_cpf(text));
                (!ok).then_some(MSG_CPF)
            }
            (Validator::Cnpj { missing }, Subject::Text(text)) => {
                let text = text.trim();
                if text.is_empty() {
                    return Some(*missing);
                }
                let ok = CNPJ_RE.is_match(text) && (!ctx.strict_documents || validate_cnpj(text));
                (!ok).then_some(MSG_CNPJ)
            }
            (Validator::RequiredDate { message }, Subject::Date(date)) => {
                date.is_none().then_some(*message)
            }
            (Validator::RequiredTime { message }, Subject::Time(present)) => {
                (!present).then_some(*message)
            }
            (Validator::NotInPast, Subject::Date(date)) => match date {
                None => Some(MSG_TRIP_DATE),
                Some(date) if date < ctx.today => Some(MSG_PAST_DATE),
                Some(_) => None,
            },
            (Validator::Range { min, max }, Subject::Count(count)) => {
                (count < *min || count > *max).then_some(MSG_PASSENGERS)
            }
            (Validator::MustAccept, Subject::Flag(accepted)) => {
                (!accepted).then_some(MSG_ACCEPT_TERMS)
            }
            (Validator::Optional(inner), Subject::Text(text)) => {
                if text.trim().is_empty() {
                    None
                } else {
                    inner.check(draft, field, ctx)
                }
            }
            (Validator::Optional(inner), Subject::Date(date)) => {
                date.and_then(|_| inner.check(draft, field, ctx))
            }
            (Validator::Optional(inner), Subject::Time(present)) => {
                if present {
                    inner.check(draft, field, ctx)
                } else {
                    None
                }
            }
            // Enum choices always hold a catalog member.
            (_, Subject::Choice) => None,
            (rule, _) => {
                tracing::debug!(?rule, %field, "validator does not apply to field kind");
                None
            }
        }
    }
}

/// Phase-one rule for a field.
pub fn rule_for(field: BookingField) -> Validator {
    match field {
        BookingField::FullName => Validator::MinLength {
            min: 3,
            message: MSG_FULL_NAME,
        },
        BookingField::Email => Validator::Email,
        BookingField::Phone => Validator::Phone,
        BookingField::Cpf => Validator::Optional(Box::new(Validator::Cpf)),
        BookingField::CompanyName => Validator::MinLength {
            min: 1,
            message: MSG_COMPANY_NAME,
        },
        BookingField::Cnpj => Validator::Cnpj {
            missing: MSG_CNPJ_REQUIRED,
        },
        BookingField::PickupAddress => Validator::MinLength {
            min: 5,
            message: MSG_PICKUP,
        },
        BookingField::DestinationAddress => Validator::MinLength {
            min: 5,
            message: MSG_DESTINATION,
        },
        BookingField::TripDate => Validator::NotInPast,
        BookingField::TripTime => Validator::RequiredTime {
            message: MSG_TRIP_TIME,
        },
        BookingField::ReturnDate => Validator::RequiredDate {
            message: MSG_RETURN_DATE,
        },
        BookingField::ReturnTime => Validator::RequiredTime {
            message: MSG_RETURN_TIME,
        },
        BookingField::Passengers => Validator::Range { min: 1, max: 7 },
        BookingField::AcceptTerms => Validator::MustAccept,
        BookingField::IsCompany
        | BookingField::ServiceType
        | BookingField::ReturnTrip
        | BookingField::VehicleType
        | BookingField::SpecialNeeds
        | BookingField::Observations
        | BookingField::PaymentMethod => Validator::None,
    }
}

/// Fields that become required only while `guard` holds.
#[derive(Clone, Copy)]
pub struct ConditionalRule {
    pub name: &'static str,
    pub guard: fn(&BookingDraft) -> bool,
    pub fields: &'static [BookingField],
}

impl fmt::Debug for ConditionalRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionalRule")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish()
    }
}

fn is_company(draft: &BookingDraft) -> bool {
    draft.is_company
}

fn has_return_trip(draft: &BookingDraft) -> bool {
    draft.return_trip
}

pub const COMPANY_RULE: ConditionalRule = ConditionalRule {
    name: "isCompany",
    guard: is_company,
    fields: &[BookingField::CompanyName, BookingField::Cnpj],
};

pub const RETURN_TRIP_RULE: ConditionalRule = ConditionalRule {
    name: "returnTrip",
    guard: has_return_trip,
    fields: &[BookingField::ReturnDate, BookingField::ReturnTime],
};

const PERSONAL_RULES: &[ConditionalRule] = &[COMPANY_RULE];
const TRIP_RULES: &[ConditionalRule] = &[RETURN_TRIP_RULE];

/// Always-required fields and conditional rules of one step.
pub fn step_fields(step: WizardStep) -> (&'static [BookingField], &'static [ConditionalRule]) {
    match step {
        WizardStep::PersonalInfo => (
            &[BookingField::FullName, BookingField::Email, BookingField::Phone],
            PERSONAL_RULES,
        ),
        WizardStep::TripDetails => (
            &[
                BookingField::ServiceType,
                BookingField::PickupAddress,
                BookingField::DestinationAddress,
                BookingField::TripDate,
                BookingField::TripTime,
            ],
            TRIP_RULES,
        ),
        WizardStep::SpecialNeeds => (&[BookingField::Passengers, BookingField::VehicleType], &[]),
        WizardStep::PaymentConfirm => (
            &[BookingField::PaymentMethod, BookingField::AcceptTerms],
            &[],
        ),
    }
}

/// Resolves the set of fields validated for `step` against the draft as it is now.
pub fn fields_for_step(draft: &BookingDraft, step: WizardStep) -> Vec<BookingField> {
    let (always, conditional) = step_fields(step);
    let mut fields = always.to_vec();
    for rule in conditional {
        if (rule.guard)(draft) {
            fields.extend_from_slice(rule.fields);
        }
    }
    fields.sort();
    fields
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: BookingField,
    pub message: String,
}

/// Validation outcome, ordered by field declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: Vec<FieldError>,
}

impl ValidationReport {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// The error shown as the transient notification.
    pub fn first(&self) -> Option<&FieldError> {
        self.errors.first()
    }

    pub fn message_for(&self, field: BookingField) -> Option<&str> {
        self.errors
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message.as_str())
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    fn push(&mut self, field: BookingField, message: &str) {
        // One message per field; the first one found wins.
        if self.message_for(field).is_none() {
            self.errors.push(FieldError {
                field,
                message: message.to_string(),
            });
        }
    }

    fn into_result(mut self) -> Result<(), ValidationReport> {
        self.errors.sort_by_key(|error| error.field);
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.first() {
            Some(error) => f.write_str(&error.message),
            None => f.write_str("no validation errors"),
        }
    }
}

fn check_fields(
    draft: &BookingDraft,
    fields: &[BookingField],
    ctx: &ValidationContext,
    report: &mut ValidationReport,
) {
    for field in fields {
        if let Some(message) = rule_for(*field).check(draft, *field, ctx) {
            report.push(*field, message);
        }
    }
}

/// Cross-field refinement: the return leg cannot precede the outbound leg.
fn check_return_order(draft: &BookingDraft, report: &mut ValidationReport) {
    if !draft.return_trip {
        return;
    }
    if let (Some(trip), Some(back)) = (draft.trip_date, draft.return_date) {
        if back < trip {
            report.push(BookingField::ReturnDate, MSG_RETURN_BEFORE_TRIP);
        }
    }
}

/// Validates exactly the fields of `step`.
pub fn validate_step(
    draft: &BookingDraft,
    step: WizardStep,
    ctx: &ValidationContext,
) -> Result<(), ValidationReport> {
    let mut report = ValidationReport::default();
    let fields = fields_for_step(draft, step);
    check_fields(draft, &fields, ctx, &mut report);
    if step == WizardStep::TripDetails {
        check_return_order(draft, &mut report);
    }
    report.into_result()
}

/// Validates the whole draft before submission. Adds the format rules for
/// documents no step gates on: the CPF always, the CNPJ outside companies.
/// Either one is skipped while blank.
pub fn validate_all(draft: &BookingDraft, ctx: &ValidationContext) -> Result<(), ValidationReport> {
    let mut report = ValidationReport::default();
    let mut fields: Vec<BookingField> = WizardStep::ALL
        .into_iter()
        .flat_map(|step| fields_for_step(draft, step))
        .collect();
    fields.push(BookingField::Cpf);
    if !draft.is_company {
        fields.push(BookingField::Cnpj);
    }
    fields.sort();
    for field in &fields {
        let rule = match field {
            BookingField::Cnpj if !draft.is_company => {
                Validator::Optional(Box::new(rule_for(BookingField::Cnpj)))
            }
            _ => rule_for(*field),
        };
        if let Some(message) = rule.check(draft, *field, ctx) {
            report.push(*field, message);
        }
    }
    check_return_order(draft, &mut report);
    report.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Passengers, TimeOfDay};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn ctx() -> ValidationContext {
        ValidationContext::new(today())
    }

    fn personal() -> BookingDraft {
        BookingDraft {
            full_name: "Maria Silva".into(),
            email: "maria@x.com".into(),
            phone: "(11) 99999-9999".into(),
            ..BookingDraft::default()
        }
    }

    fn complete() -> BookingDraft {
        BookingDraft {
            pickup_address: "Av. Paulista, 1000".into(),
            destination_address: "Aeroporto de Guarulhos".into(),
            trip_date: Some(today()),
            trip_time: TimeOfDay::new(14, 0),
            accept_terms: true,
            ..personal()
        }
    }

    #[test]
    fn personal_step_passes_with_valid_contact() {
        assert!(validate_step(&personal(), WizardStep::PersonalInfo, &ctx()).is_ok());
    }

    #[test]
    fn company_fields_ignored_unless_company() {
        let mut draft = personal();
        draft.company_name = String::new();
        draft.cnpj = "garbage".into();
        assert!(validate_step(&draft, WizardStep::PersonalInfo, &ctx()).is_ok());
    }

    #[test]
    fn company_fields_required_for_company() {
        let mut draft = personal();
        draft.is_company = true;
        let report = validate_step(&draft, WizardStep::PersonalInfo, &ctx()).unwrap_err();
        assert_eq!(report.message_for(BookingField::CompanyName), Some(MSG_COMPANY_NAME));
        assert_eq!(report.message_for(BookingField::Cnpj), Some(MSG_CNPJ_REQUIRED));

        draft.company_name = "Acme".into();
        draft.cnpj = "11.222.333/0001-81".into();
        assert!(validate_step(&draft, WizardStep::PersonalInfo, &ctx()).is_ok());
    }

    #[test]
    fn first_error_follows_declaration_order() {
        let draft = BookingDraft {
            phone: "11999999999".into(),
            ..BookingDraft::default()
        };
        let report = validate_step(&draft, WizardStep::PersonalInfo, &ctx()).unwrap_err();
        assert_eq!(report.len(), 3);
        assert_eq!(report.first().map(|e| e.field), Some(BookingField::FullName));
        assert_eq!(report.to_string(), MSG_FULL_NAME);
        assert_eq!(report.message_for(BookingField::Phone), Some(MSG_PHONE));
    }

    #[test]
    fn phone_requires_mobile_nine() {
        let mut draft = personal();
        draft.phone = "(11) 89999-9999".into();
        assert!(validate_step(&draft, WizardStep::PersonalInfo, &ctx()).is_err());
    }

    #[test]
    fn return_fields_follow_return_flag() {
        let mut draft = complete();
        draft.return_date = None;
        assert!(validate_step(&draft, WizardStep::TripDetails, &ctx()).is_ok());

        draft.return_trip = true;
        let report = validate_step(&draft, WizardStep::TripDetails, &ctx()).unwrap_err();
        assert_eq!(report.message_for(BookingField::ReturnDate), Some(MSG_RETURN_DATE));
        assert_eq!(report.message_for(BookingField::ReturnTime), Some(MSG_RETURN_TIME));

        draft.return_date = today().pred_opt();
        draft.return_time = TimeOfDay::new(18, 0);
        let report = validate_step(&draft, WizardStep::TripDetails, &ctx()).unwrap_err();
        assert_eq!(
            report.message_for(BookingField::ReturnDate),
            Some(MSG_RETURN_BEFORE_TRIP)
        );

        draft.return_date = Some(today());
        assert!(validate_step(&draft, WizardStep::TripDetails, &ctx()).is_ok());
    }

    #[test]
    fn trip_date_cannot_be_past() {
        let mut draft = complete();
        draft.trip_date = today().pred_opt();
        let report = validate_step(&draft, WizardStep::TripDetails, &ctx()).unwrap_err();
        assert_eq!(report.message_for(BookingField::TripDate), Some(MSG_PAST_DATE));
    }

    #[test]
    fn passengers_range() {
        let mut draft = complete();
        draft.passengers = Passengers(0);
        assert!(validate_step(&draft, WizardStep::SpecialNeeds, &ctx()).is_err());
        draft.passengers = Passengers(8);
        assert!(validate_step(&draft, WizardStep::SpecialNeeds, &ctx()).is_err());
        draft.passengers = Passengers(7);
        assert!(validate_step(&draft, WizardStep::SpecialNeeds, &ctx()).is_ok());
    }

    #[test]
    fn terms_must_be_accepted() {
        let mut draft = complete();
        draft.accept_terms = false;
        let report = validate_step(&draft, WizardStep::PaymentConfirm, &ctx()).unwrap_err();
        assert_eq!(report.to_string(), MSG_ACCEPT_TERMS);
    }

    #[test]
    fn full_validation_checks_provided_cpf() {
        let mut draft = complete();
        assert!(validate_all(&draft, &ctx()).is_ok());

        draft.cpf = "123".into();
        let report = validate_all(&draft, &ctx()).unwrap_err();
        assert_eq!(report.message_for(BookingField::Cpf), Some(MSG_CPF));
    }

    #[test]
    fn full_validation_checks_provided_cnpj_outside_companies() {
        let mut draft = complete();
        draft.cnpj = "1122".into();
        let report = validate_all(&draft, &ctx()).unwrap_err();
        assert_eq!(report.message_for(BookingField::Cnpj), Some(MSG_CNPJ));

        draft.cnpj = "11.222.333/0001-81".into();
        assert!(validate_all(&draft, &ctx()).is_ok());
        draft.cnpj = "  ".into();
        assert!(validate_all(&draft, &ctx()).is_ok());
    }

    #[test]
    fn email_rule_local_part() {
        let mut draft = personal();
        for (email, valid) in [
            ("o'neil@x.com", true),
            ("ana.maria+seoo@mail.com.br", true),
            ("MARIA@X.COM", true),
            ("a..b@x.com", false),
            (".a@x.com", false),
            ("a.@x.com", false),
            ("maria@x", false),
            ("maria@x.c", false),
        ] {
            draft.email = email.into();
            assert_eq!(
                validate_step(&draft, WizardStep::PersonalInfo, &ctx()).is_ok(),
                valid,
                "{email}"
            );
        }
    }

    #[test]
    fn min_length_counts_raw_characters() {
        let mut draft = personal();
        draft.full_name = "  ab".into();
        assert!(validate_step(&draft, WizardStep::PersonalInfo, &ctx()).is_ok());
        draft.full_name = "ab".into();
        let report = validate_step(&draft, WizardStep::PersonalInfo, &ctx()).unwrap_err();
        assert_eq!(report.to_string(), MSG_FULL_NAME);
    }

    #[test]
    fn strict_documents_checks_digits() {
        let mut draft = complete();
        draft.cpf = "529.982.247-26".into();
        assert!(validate_all(&draft, &ctx()).is_ok());
        assert!(validate_all(&draft, &ctx().strict(true)).is_err());

        draft.cpf = "529.982.247-25".into();
        assert!(validate_all(&draft, &ctx().strict(true)).is_ok());
    }

    #[test]
    fn step_sets_match_table() {
        let mut draft = BookingDraft::default();
        assert_eq!(
            fields_for_step(&draft, WizardStep::PersonalInfo),
            vec![BookingField::FullName, BookingField::Email, BookingField::Phone]
        );
        draft.is_company = true;
        draft.return_trip = true;
        assert_eq!(
            fields_for_step(&draft, WizardStep::PersonalInfo),
            vec![
                BookingField::FullName,
                BookingField::Email,
                BookingField::Phone,
                BookingField::CompanyName,
                BookingField::Cnpj
            ]
        );
        assert_eq!(fields_for_step(&draft, WizardStep::TripDetails).len(), 7);
        assert_eq!(
            fields_for_step(&draft, WizardStep::PaymentConfirm),
            vec![BookingField::PaymentMethod, BookingField::AcceptTerms]
        );
    }
}
