//! The persisted form of a draft.
//!
//! The snapshot is one JSON object whose keys are the camelCase draft field
//! names, plus `currentStep`. Missing keys take their defaults and unknown
//! keys are ignored. `currentStep` is written for reference only: restoring
//! always resumes at the first step.

use serde_json::Value;

use super::draft::BookingDraft;
use crate::errors::BookingError;

pub const CURRENT_STEP_KEY: &str = "currentStep";

/// Serializes the draft and the wizard position into the snapshot text.
pub fn encode(draft: &BookingDraft, current_step: u8) -> Result<String, BookingError> {
    let mut value = serde_json::to_value(draft)?;
    if let Value::Object(map) = &mut value {
        map.insert(CURRENT_STEP_KEY.into(), Value::from(current_step));
    }
    Ok(serde_json::to_string(&value)?)
}

/// Rebuilds a draft from snapshot text. Fails only when the text is not a
/// JSON object; individual malformed values fall back to their defaults.
pub fn decode(raw: &str) -> Result<BookingDraft, BookingError> {
    let value: Value = serde_json::from_str(raw)?;
    if !value.is_object() {
        return Err(BookingError::Storage(format!(
            "snapshot is not a JSON object (found {})",
            kind_of(&value)
        )));
    }
    Ok(serde_json::from_value(value)?)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Passengers, PaymentMethod, ServiceType, TimeOfDay, VehicleType};
    use chrono::NaiveDate;

    fn populated() -> BookingDraft {
        let mut draft = BookingDraft {
            full_name: "Maria Silva".into(),
            email: "maria@x.com".into(),
            phone: "(11) 99999-9999".into(),
            cpf: "529.982.247-25".into(),
            is_company: true,
            company_name: "Empresa LTDA".into(),
            cnpj: "11.222.333/0001-81".into(),
            service_type: ServiceType::Exclusive,
            pickup_address: "Av. Paulista, 1000".into(),
            destination_address: "Aeroporto de Guarulhos".into(),
            trip_date: NaiveDate::from_ymd_opt(2026, 11, 3),
            trip_time: TimeOfDay::new(14, 0),
            return_trip: true,
            return_date: NaiveDate::from_ymd_opt(2026, 11, 5),
            return_time: TimeOfDay::new(18, 30),
            passengers: Passengers(3),
            vehicle_type: VehicleType::Luxury,
            observations: "Duas malas grandes".into(),
            payment_method: PaymentMethod::Invoice,
            accept_terms: true,
            estimated_price: Some(972.0),
            ..BookingDraft::default()
        };
        draft.special_needs.child_seat = true;
        draft
    }

    #[test]
    fn round_trip_preserves_every_field() {
        let draft = populated();
        let raw = encode(&draft, 4).unwrap();
        assert_eq!(decode(&raw).unwrap(), draft);
    }

    #[test]
    fn encode_uses_camel_case_keys_and_iso_dates() {
        let raw = encode(&populated(), 2).unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["fullName"], "Maria Silva");
        assert_eq!(value["tripDate"], "2026-11-03");
        assert_eq!(value["tripTime"], "14:00");
        assert_eq!(value["specialNeeds"]["childSeat"], true);
        assert_eq!(value["currentStep"], 2);
    }

    #[test]
    fn partial_snapshot_keeps_defaults() {
        let draft = decode(r#"{ "fullName": "Ana", "passengers": 4, "extra": [1, 2] }"#).unwrap();
        assert_eq!(draft.full_name, "Ana");
        assert_eq!(draft.passengers, Passengers(4));
        assert_eq!(draft.vehicle_type, VehicleType::Suv);
        assert!(draft.special_needs.woman_driver);
    }

    #[test]
    fn malformed_values_fall_back_individually() {
        let draft = decode(
            r#"{ "email": "a@b.co", "tripDate": "", "passengers": "muitos",
                 "vehicleType": "limousine", "specialNeeds": { "wheelchair": true } }"#,
        )
        .unwrap();
        assert_eq!(draft.email, "a@b.co");
        assert_eq!(draft.trip_date, None);
        assert_eq!(draft.passengers, Passengers(1));
        assert_eq!(draft.vehicle_type, VehicleType::Suv);
        assert!(draft.special_needs.wheelchair);
        assert!(draft.special_needs.woman_driver);
    }

    #[test]
    fn non_object_snapshots_are_rejected() {
        assert!(decode("[1, 2, 3]").is_err());
        assert!(decode("not json").is_err());
    }
}
