use std::fmt;

use chrono::NaiveDate;

use super::catalog::{PaymentMethod, ServiceType, SpecialNeed, VehicleType};
use super::draft::{BookingDraft, Passengers, SpecialNeeds, TimeOfDay};
use crate::core::documents::{format_cnpj, format_cpf, format_phone};
use crate::errors::BookingError;

/// Every draft field, in declaration order.
///
/// The order matters: validation reports errors in this order and the
/// first one becomes the user-facing notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BookingField {
    FullName,
    Email,
    Phone,
    Cpf,
    IsCompany,
    CompanyName,
    Cnpj,
    ServiceType,
    PickupAddress,
    DestinationAddress,
    TripDate,
    TripTime,
    ReturnTrip,
    ReturnDate,
    ReturnTime,
    Passengers,
    VehicleType,
    SpecialNeeds,
    Observations,
    PaymentMethod,
    AcceptTerms,
}

impl BookingField {
    pub const ALL: [BookingField; 21] = [
        BookingField::FullName,
        BookingField::Email,
        BookingField::Phone,
        BookingField::Cpf,
        BookingField::IsCompany,
        BookingField::CompanyName,
        BookingField::Cnpj,
        BookingField::ServiceType,
        BookingField::PickupAddress,
        BookingField::DestinationAddress,
        BookingField::TripDate,
        BookingField::TripTime,
        BookingField::ReturnTrip,
        BookingField::ReturnDate,
        BookingField::ReturnTime,
        BookingField::Passengers,
        BookingField::VehicleType,
        BookingField::SpecialNeeds,
        BookingField::Observations,
        BookingField::PaymentMethod,
        BookingField::AcceptTerms,
    ];

    /// Key used in the persisted snapshot.
    pub fn key(self) -> &'static str {
        match self {
            BookingField::FullName => "fullName",
            BookingField::Email => "email",
            BookingField::Phone => "phone",
            BookingField::Cpf => "cpf",
            BookingField::IsCompany => "isCompany",
            BookingField::CompanyName => "companyName",
            BookingField::Cnpj => "cnpj",
            BookingField::ServiceType => "serviceType",
            BookingField::PickupAddress => "pickupAddress",
            BookingField::DestinationAddress => "destinationAddress",
            BookingField::TripDate => "tripDate",
            BookingField::TripTime => "tripTime",
            BookingField::ReturnTrip => "returnTrip",
            BookingField::ReturnDate => "returnDate",
            BookingField::ReturnTime => "returnTime",
            BookingField::Passengers => "passengers",
            BookingField::VehicleType => "vehicleType",
            BookingField::SpecialNeeds => "specialNeeds",
            BookingField::Observations => "observations",
            BookingField::PaymentMethod => "paymentMethod",
            BookingField::AcceptTerms => "acceptTerms",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BookingField::FullName => "Nome completo",
            BookingField::Email => "Email",
            BookingField::Phone => "Telefone",
            BookingField::Cpf => "CPF (opcional)",
            BookingField::IsCompany => "Reserva corporativa?",
            BookingField::CompanyName => "Nome da empresa",
            BookingField::Cnpj => "CNPJ",
            BookingField::ServiceType => "Serviço",
            BookingField::PickupAddress => "Endereço de embarque",
            BookingField::DestinationAddress => "Endereço de destino",
            BookingField::TripDate => "Data da viagem",
            BookingField::TripTime => "Horário",
            BookingField::ReturnTrip => "Incluir volta?",
            BookingField::ReturnDate => "Data da volta",
            BookingField::ReturnTime => "Horário da volta",
            BookingField::Passengers => "Passageiros",
            BookingField::VehicleType => "Veículo",
            BookingField::SpecialNeeds => "Necessidades especiais",
            BookingField::Observations => "Observações",
            BookingField::PaymentMethod => "Forma de pagamento",
            BookingField::AcceptTerms => "Aceito os Termos de Uso e a Política de Privacidade",
        }
    }

    /// Current value rendered as editable text.
    pub fn current_text(self, draft: &BookingDraft) -> String {
        match self {
            BookingField::FullName => draft.full_name.clone(),
            BookingField::Email => draft.email.clone(),
            BookingField::Phone => draft.phone.clone(),
            BookingField::Cpf => draft.cpf.clone(),
            BookingField::IsCompany => yes_no(draft.is_company),
            BookingField::CompanyName => draft.company_name.clone(),
            BookingField::Cnpj => draft.cnpj.clone(),
            BookingField::ServiceType => draft.service_type.key().to_string(),
            BookingField::PickupAddress => draft.pickup_address.clone(),
            BookingField::DestinationAddress => draft.destination_address.clone(),
            BookingField::TripDate => draft.trip_date.map(|d| d.to_string()).unwrap_or_default(),
            BookingField::TripTime => draft.trip_time.map(|t| t.to_string()).unwrap_or_default(),
            BookingField::ReturnTrip => yes_no(draft.return_trip),
            BookingField::ReturnDate => {
                draft.return_date.map(|d| d.to_string()).unwrap_or_default()
            }
            BookingField::ReturnTime => {
                draft.return_time.map(|t| t.to_string()).unwrap_or_default()
            }
            BookingField::Passengers => draft.passengers.to_string(),
            BookingField::VehicleType => draft.vehicle_type.key().to_string(),
            BookingField::SpecialNeeds => draft
                .special_needs
                .active()
                .map(SpecialNeed::key)
                .collect::<Vec<_>>()
                .join(","),
            BookingField::Observations => draft.observations.clone(),
            BookingField::PaymentMethod => draft.payment_method.key().to_string(),
            BookingField::AcceptTerms => yes_no(draft.accept_terms),
        }
    }
}

impl fmt::Display for BookingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

fn yes_no(value: bool) -> String {
    let text = if value { "sim" } else { "não" };
    text.to_string()
}

/// A single committed edit to the draft.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldChange {
    FullName(String),
    Email(String),
    Phone(String),
    Cpf(String),
    IsCompany(bool),
    CompanyName(String),
    Cnpj(String),
    ServiceType(ServiceType),
    PickupAddress(String),
    DestinationAddress(String),
    TripDate(Option<NaiveDate>),
    TripTime(Option<TimeOfDay>),
    ReturnTrip(bool),
    ReturnDate(Option<NaiveDate>),
    ReturnTime(Option<TimeOfDay>),
    Passengers(u8),
    VehicleType(VehicleType),
    SpecialNeed(SpecialNeed, bool),
    SpecialNeeds(SpecialNeeds),
    Observations(String),
    PaymentMethod(PaymentMethod),
    AcceptTerms(bool),
}

impl FieldChange {
    pub fn field(&self) -> BookingField {
        match self {
            FieldChange::FullName(_) => BookingField::FullName,
            FieldChange::Email(_) => BookingField::Email,
            FieldChange::Phone(_) => BookingField::Phone,
            FieldChange::Cpf(_) => BookingField::Cpf,
            FieldChange::IsCompany(_) => BookingField::IsCompany,
            FieldChange::CompanyName(_) => BookingField::CompanyName,
            FieldChange::Cnpj(_) => BookingField::Cnpj,
            FieldChange::ServiceType(_) => BookingField::ServiceType,
            FieldChange::PickupAddress(_) => BookingField::PickupAddress,
            FieldChange::DestinationAddress(_) => BookingField::DestinationAddress,
            FieldChange::TripDate(_) => BookingField::TripDate,
            FieldChange::TripTime(_) => BookingField::TripTime,
            FieldChange::ReturnTrip(_) => BookingField::ReturnTrip,
            FieldChange::ReturnDate(_) => BookingField::ReturnDate,
            FieldChange::ReturnTime(_) => BookingField::ReturnTime,
            FieldChange::Passengers(_) => BookingField::Passengers,
            FieldChange::VehicleType(_) => BookingField::VehicleType,
            FieldChange::SpecialNeed(..) | FieldChange::SpecialNeeds(_) => {
                BookingField::SpecialNeeds
            }
            FieldChange::Observations(_) => BookingField::Observations,
            FieldChange::PaymentMethod(_) => BookingField::PaymentMethod,
            FieldChange::AcceptTerms(_) => BookingField::AcceptTerms,
        }
    }

    /// Writes the change into the draft. Last write wins.
    pub fn apply_to(self, draft: &mut BookingDraft) {
        match self {
            FieldChange::FullName(value) => draft.full_name = value,
            FieldChange::Email(value) => draft.email = value,
            FieldChange::Phone(value) => draft.phone = value,
            FieldChange::Cpf(value) => draft.cpf = value,
            FieldChange::IsCompany(value) => draft.is_company = value,
            FieldChange::CompanyName(value) => draft.company_name = value,
            FieldChange::Cnpj(value) => draft.cnpj = value,
            FieldChange::ServiceType(value) => draft.service_type = value,
            FieldChange::PickupAddress(value) => draft.pickup_address = value,
            FieldChange::DestinationAddress(value) => draft.destination_address = value,
            FieldChange::TripDate(value) => draft.trip_date = value,
            FieldChange::TripTime(value) => draft.trip_time = value,
            FieldChange::ReturnTrip(value) => draft.return_trip = value,
            FieldChange::ReturnDate(value) => draft.return_date = value,
            FieldChange::ReturnTime(value) => draft.return_time = value,
            FieldChange::Passengers(value) => draft.passengers = Passengers(value),
            FieldChange::VehicleType(value) => draft.vehicle_type = value,
            FieldChange::SpecialNeed(need, enabled) => draft.special_needs.set(need, enabled),
            FieldChange::SpecialNeeds(value) => draft.special_needs = value,
            FieldChange::Observations(value) => draft.observations = value,
            FieldChange::PaymentMethod(value) => draft.payment_method = value,
            FieldChange::AcceptTerms(value) => draft.accept_terms = value,
        }
    }

    /// Converts raw user text into a typed change.
    ///
    /// Phone, CPF and CNPJ input goes through the display masks, so bare
    /// digits are accepted. Blank input clears optional values.
    pub fn parse(field: BookingField, raw: &str) -> Result<FieldChange, BookingError> {
        let text = raw.trim();
        let change = match field {
            BookingField::FullName => FieldChange::FullName(text.to_string()),
            BookingField::Email => FieldChange::Email(text.to_string()),
            BookingField::Phone => FieldChange::Phone(format_phone(text)),
            BookingField::Cpf => FieldChange::Cpf(format_cpf(text)),
            BookingField::IsCompany => FieldChange::IsCompany(parse_flag(field, text)?),
            BookingField::CompanyName => FieldChange::CompanyName(text.to_string()),
            BookingField::Cnpj => FieldChange::Cnpj(format_cnpj(text)),
            BookingField::ServiceType => {
                FieldChange::ServiceType(text.parse().map_err(|err| invalid(field, err))?)
            }
            BookingField::PickupAddress => FieldChange::PickupAddress(text.to_string()),
            BookingField::DestinationAddress => FieldChange::DestinationAddress(text.to_string()),
            BookingField::TripDate => FieldChange::TripDate(parse_date(field, text)?),
            BookingField::TripTime => FieldChange::TripTime(parse_time(field, text)?),
            BookingField::ReturnTrip => FieldChange::ReturnTrip(parse_flag(field, text)?),
            BookingField::ReturnDate => FieldChange::ReturnDate(parse_date(field, text)?),
            BookingField::ReturnTime => FieldChange::ReturnTime(parse_time(field, text)?),
            BookingField::Passengers => FieldChange::Passengers(
                text.parse::<u8>()
                    .map_err(|_| invalid(field, "Informe um número inteiro (ex.: 2)"))?,
            ),
            BookingField::VehicleType => {
                FieldChange::VehicleType(text.parse().map_err(|err| invalid(field, err))?)
            }
            BookingField::SpecialNeeds => FieldChange::SpecialNeeds(parse_needs(field, text)?),
            BookingField::Observations => FieldChange::Observations(text.to_string()),
            BookingField::PaymentMethod => {
                FieldChange::PaymentMethod(text.parse().map_err(|err| invalid(field, err))?)
            }
            BookingField::AcceptTerms => FieldChange::AcceptTerms(parse_flag(field, text)?),
        };
        Ok(change)
    }
}

fn invalid(field: BookingField, message: impl fmt::Display) -> BookingError {
    BookingError::InvalidInput {
        field: field.key(),
        message: message.to_string(),
    }
}

fn parse_flag(field: BookingField, text: &str) -> Result<bool, BookingError> {
    match text.to_lowercase().as_str() {
        "y" | "yes" | "s" | "sim" | "true" | "1" => Ok(true),
        "n" | "no" | "não" | "nao" | "false" | "0" => Ok(false),
        _ => Err(invalid(field, "Responda sim/não")),
    }
}

fn parse_date(field: BookingField, text: &str) -> Result<Option<NaiveDate>, BookingError> {
    if text.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(text, "%d/%m/%Y"))
        .map(Some)
        .map_err(|_| invalid(field, "Use o formato AAAA-MM-DD ou DD/MM/AAAA"))
}

fn parse_time(field: BookingField, text: &str) -> Result<Option<TimeOfDay>, BookingError> {
    if text.is_empty() {
        return Ok(None);
    }
    TimeOfDay::parse(text)
        .map(Some)
        .ok_or_else(|| invalid(field, "Use o formato HH:MM (24h)"))
}

fn parse_needs(field: BookingField, text: &str) -> Result<SpecialNeeds, BookingError> {
    let mut needs = Vec::new();
    for part in text.split(',').map(str::trim).filter(|part| !part.is_empty()) {
        let need: SpecialNeed = part.parse().map_err(|err| invalid(field, err))?;
        needs.push(need);
    }
    Ok(SpecialNeeds::only(&needs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_applies_document_masks() {
        assert_eq!(
            FieldChange::parse(BookingField::Phone, "11999999999").unwrap(),
            FieldChange::Phone("(11) 99999-9999".into())
        );
        assert_eq!(
            FieldChange::parse(BookingField::Cpf, "52998224725").unwrap(),
            FieldChange::Cpf("529.982.247-25".into())
        );
        assert_eq!(
            FieldChange::parse(BookingField::Cnpj, "11222333000181").unwrap(),
            FieldChange::Cnpj("11.222.333/0001-81".into())
        );
    }

    #[test]
    fn parse_accepts_both_date_styles_and_blank() {
        let expected = NaiveDate::from_ymd_opt(2026, 11, 3);
        assert_eq!(
            FieldChange::parse(BookingField::TripDate, "2026-11-03").unwrap(),
            FieldChange::TripDate(expected)
        );
        assert_eq!(
            FieldChange::parse(BookingField::ReturnDate, "03/11/2026").unwrap(),
            FieldChange::ReturnDate(expected)
        );
        assert_eq!(
            FieldChange::parse(BookingField::ReturnDate, "  ").unwrap(),
            FieldChange::ReturnDate(None)
        );
        assert!(FieldChange::parse(BookingField::TripDate, "amanhã").is_err());
    }

    #[test]
    fn parse_flags_and_choices() {
        assert_eq!(
            FieldChange::parse(BookingField::IsCompany, "Sim").unwrap(),
            FieldChange::IsCompany(true)
        );
        assert_eq!(
            FieldChange::parse(BookingField::VehicleType, "2").unwrap(),
            FieldChange::VehicleType(VehicleType::Luxury)
        );
        let err = FieldChange::parse(BookingField::AcceptTerms, "talvez").unwrap_err();
        assert!(matches!(err, BookingError::InvalidInput { field: "acceptTerms", .. }));
    }

    #[test]
    fn parse_special_needs_list_sets_exactly_those_flags() {
        let change =
            FieldChange::parse(BookingField::SpecialNeeds, "wheelchair, womanDriver").unwrap();
        let FieldChange::SpecialNeeds(needs) = change else {
            panic!("unexpected change: {:?}", change);
        };
        assert!(needs.wheelchair);
        assert!(needs.woman_driver);
        assert!(!needs.child_seat);
    }

    #[test]
    fn apply_then_read_back_text() {
        let mut draft = BookingDraft::default();
        FieldChange::parse(BookingField::TripTime, "09:30")
            .unwrap()
            .apply_to(&mut draft);
        FieldChange::SpecialNeed(SpecialNeed::ChildSeat, true).apply_to(&mut draft);
        assert_eq!(BookingField::TripTime.current_text(&draft), "09:30");
        assert_eq!(
            BookingField::SpecialNeeds.current_text(&draft),
            "childSeat,womanDriver"
        );
        assert_eq!(BookingField::IsCompany.current_text(&draft), "não");
    }

    #[test]
    fn declaration_order_is_total() {
        let mut sorted = BookingField::ALL;
        sorted.sort();
        assert_eq!(sorted, BookingField::ALL);
    }
}
