use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::catalog::{PaymentMethod, ServiceType, SpecialNeed, VehicleType};
use super::lenient;

const TIME_FORMAT: &str = "%H:%M";

/// A time of day rendered as `HH:MM`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(pub NaiveTime);

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// Accepts `HH:MM` and `HH:MM:SS`.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        NaiveTime::parse_from_str(trimmed, TIME_FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
            .ok()
            .map(Self)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIME_FORMAT))
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        TimeOfDay::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid time of day `{raw}`")))
    }
}

/// Passenger count. The 1..=7 range is a validation rule, not a type invariant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Passengers(pub u8);

impl Default for Passengers {
    fn default() -> Self {
        Passengers(1)
    }
}

impl fmt::Display for Passengers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpecialNeeds {
    #[serde(deserialize_with = "lenient::or_default")]
    pub wheelchair: bool,
    #[serde(deserialize_with = "lenient::or_default")]
    pub extra_luggage: bool,
    #[serde(deserialize_with = "lenient::or_default")]
    pub pet_friendly: bool,
    #[serde(deserialize_with = "lenient::or_default")]
    pub child_seat: bool,
    #[serde(deserialize_with = "lenient::or_true")]
    pub woman_driver: bool,
}

impl Default for SpecialNeeds {
    fn default() -> Self {
        Self {
            wheelchair: false,
            extra_luggage: false,
            pet_friendly: false,
            child_seat: false,
            woman_driver: true,
        }
    }
}

impl SpecialNeeds {
    pub fn get(&self, need: SpecialNeed) -> bool {
        match need {
            SpecialNeed::Wheelchair => self.wheelchair,
            SpecialNeed::ExtraLuggage => self.extra_luggage,
            SpecialNeed::PetFriendly => self.pet_friendly,
            SpecialNeed::ChildSeat => self.child_seat,
            SpecialNeed::WomanDriver => self.woman_driver,
        }
    }

    pub fn set(&mut self, need: SpecialNeed, enabled: bool) {
        let slot = match need {
            SpecialNeed::Wheelchair => &mut self.wheelchair,
            SpecialNeed::ExtraLuggage => &mut self.extra_luggage,
            SpecialNeed::PetFriendly => &mut self.pet_friendly,
            SpecialNeed::ChildSeat => &mut self.child_seat,
            SpecialNeed::WomanDriver => &mut self.woman_driver,
        };
        *slot = enabled;
    }

    /// Flags that are switched on, in catalog order.
    pub fn active(&self) -> impl Iterator<Item = SpecialNeed> + '_ {
        SpecialNeed::ALL
            .into_iter()
            .filter(move |need| self.get(*need))
    }

    /// Builds a record with exactly the given flags switched on.
    pub fn only(needs: &[SpecialNeed]) -> Self {
        let mut record = Self {
            woman_driver: false,
            ..Self::default()
        };
        for need in needs {
            record.set(*need, true);
        }
        record
    }
}

/// The in-progress booking held by the wizard.
///
/// Optional text fields use the empty string for "not provided", matching
/// what the form inputs hold. Every field tolerates a malformed persisted
/// value by falling back to its default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BookingDraft {
    #[serde(deserialize_with = "lenient::or_default")]
    pub full_name: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub email: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub phone: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub cpf: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub is_company: bool,
    #[serde(deserialize_with = "lenient::or_default")]
    pub company_name: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub cnpj: String,

    #[serde(deserialize_with = "lenient::or_default")]
    pub service_type: ServiceType,
    #[serde(deserialize_with = "lenient::or_default")]
    pub pickup_address: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub destination_address: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub trip_date: Option<NaiveDate>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub trip_time: Option<TimeOfDay>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub return_trip: bool,
    #[serde(deserialize_with = "lenient::or_default")]
    pub return_date: Option<NaiveDate>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub return_time: Option<TimeOfDay>,

    #[serde(deserialize_with = "lenient::or_default")]
    pub passengers: Passengers,
    #[serde(deserialize_with = "lenient::or_default")]
    pub vehicle_type: VehicleType,
    #[serde(deserialize_with = "lenient::or_default")]
    pub special_needs: SpecialNeeds,
    #[serde(deserialize_with = "lenient::or_default")]
    pub observations: String,

    #[serde(deserialize_with = "lenient::or_default")]
    pub payment_method: PaymentMethod,
    #[serde(deserialize_with = "lenient::or_default")]
    pub accept_terms: bool,

    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::or_default"
    )]
    pub estimated_price: Option<f64>,
}

impl Default for BookingDraft {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            email: String::new(),
            phone: String::new(),
            cpf: String::new(),
            is_company: false,
            company_name: String::new(),
            cnpj: String::new(),
            service_type: ServiceType::default(),
            pickup_address: String::new(),
            destination_address: String::new(),
            trip_date: None,
            trip_time: None,
            return_trip: false,
            return_date: None,
            return_time: None,
            passengers: Passengers::default(),
            vehicle_type: VehicleType::default(),
            special_needs: SpecialNeeds::default(),
            observations: String::new(),
            payment_method: PaymentMethod::default(),
            accept_terms: false,
            estimated_price: None,
        }
    }
}

impl BookingDraft {
    pub fn has_cpf(&self) -> bool {
        !self.cpf.trim().is_empty()
    }

    pub fn has_observations(&self) -> bool {
        !self.observations.trim().is_empty()
    }
}
