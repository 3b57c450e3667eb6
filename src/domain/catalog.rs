//! Fixed catalogs offered on the booking form: services, vehicles, payment
//! methods, and special-need flags.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Named service offerings. Each carries a label and a pricing multiplier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    #[default]
    Transfer,
    Corporate,
    Experience,
    Exclusive,
    Dayuse,
    Travel,
    Care,
    Children,
}

impl ServiceType {
    pub const ALL: [ServiceType; 8] = [
        ServiceType::Transfer,
        ServiceType::Corporate,
        ServiceType::Experience,
        ServiceType::Exclusive,
        ServiceType::Dayuse,
        ServiceType::Travel,
        ServiceType::Care,
        ServiceType::Children,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ServiceType::Transfer => "transfer",
            ServiceType::Corporate => "corporate",
            ServiceType::Experience => "experience",
            ServiceType::Exclusive => "exclusive",
            ServiceType::Dayuse => "dayuse",
            ServiceType::Travel => "travel",
            ServiceType::Care => "care",
            ServiceType::Children => "children",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ServiceType::Transfer => "SEOO Transfer",
            ServiceType::Corporate => "SEOO Corporate",
            ServiceType::Experience => "SEOO Experience",
            ServiceType::Exclusive => "SEOO Exclusive",
            ServiceType::Dayuse => "SEOO Day Use",
            ServiceType::Travel => "SEOO Travel",
            ServiceType::Care => "SEOO Care",
            ServiceType::Children => "SEOO Children & Teens",
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            ServiceType::Transfer => "Aeroportos e hotéis",
            ServiceType::Corporate => "Executivo",
            ServiceType::Experience => "Eventos",
            ServiceType::Exclusive => "Motorista fixa",
            ServiceType::Dayuse => "Por período",
            ServiceType::Travel => "Viagens",
            ServiceType::Care => "Cuidados especiais",
            ServiceType::Children => "Crianças",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ServiceType::Transfer => "Transfers com pontualidade e conforto absoluto",
            ServiceType::Corporate => "Atendimento exclusivo para executivas e empresas",
            ServiceType::Experience => "Logística completa para eventos e feiras",
            ServiceType::Exclusive => "Contrato mensal com motorista exclusiva",
            ServiceType::Dayuse => "Motorista dedicada por período determinado",
            ServiceType::Travel => "Viagens intermunicipais com total conforto",
            ServiceType::Care => "Atendimento para necessidades específicas",
            ServiceType::Children => "Transporte seguro com motoristas que são mães",
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            ServiceType::Transfer => 1.2,
            ServiceType::Corporate => 1.3,
            ServiceType::Experience => 1.5,
            ServiceType::Exclusive => 2.0,
            ServiceType::Dayuse => 1.4,
            ServiceType::Travel => 1.6,
            ServiceType::Care => 1.1,
            ServiceType::Children => 1.2,
        }
    }
}

/// Vehicle classes available for a ride.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    Executive,
    Luxury,
    #[default]
    Suv,
}

impl VehicleType {
    pub const ALL: [VehicleType; 3] = [
        VehicleType::Executive,
        VehicleType::Luxury,
        VehicleType::Suv,
    ];

    pub fn key(self) -> &'static str {
        match self {
            VehicleType::Executive => "executive",
            VehicleType::Luxury => "luxury",
            VehicleType::Suv => "suv",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VehicleType::Executive => "Executivo",
            VehicleType::Luxury => "Luxo",
            VehicleType::Suv => "SUV Híbrido",
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            VehicleType::Executive => 1.0,
            VehicleType::Luxury => 1.5,
            VehicleType::Suv => 1.3,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Pix,
    Card,
    Invoice,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::Pix,
        PaymentMethod::Card,
        PaymentMethod::Invoice,
    ];

    pub fn key(self) -> &'static str {
        match self {
            PaymentMethod::Pix => "pix",
            PaymentMethod::Card => "card",
            PaymentMethod::Invoice => "invoice",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::Pix => "PIX",
            PaymentMethod::Card => "Cartão",
            PaymentMethod::Invoice => "Faturamento",
        }
    }
}

/// Independent ride requirements the client can toggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpecialNeed {
    Wheelchair,
    ExtraLuggage,
    PetFriendly,
    ChildSeat,
    WomanDriver,
}

impl SpecialNeed {
    pub const ALL: [SpecialNeed; 5] = [
        SpecialNeed::Wheelchair,
        SpecialNeed::ExtraLuggage,
        SpecialNeed::PetFriendly,
        SpecialNeed::ChildSeat,
        SpecialNeed::WomanDriver,
    ];

    pub fn key(self) -> &'static str {
        match self {
            SpecialNeed::Wheelchair => "wheelchair",
            SpecialNeed::ExtraLuggage => "extraLuggage",
            SpecialNeed::PetFriendly => "petFriendly",
            SpecialNeed::ChildSeat => "childSeat",
            SpecialNeed::WomanDriver => "womanDriver",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SpecialNeed::Wheelchair => "Acessível para cadeirante",
            SpecialNeed::ExtraLuggage => "Bagagem extra",
            SpecialNeed::PetFriendly => "Pet friendly",
            SpecialNeed::ChildSeat => "Cadeirinha infantil",
            SpecialNeed::WomanDriver => "Motorista mulher",
        }
    }
}

/// Error returned when text does not name a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOption {
    pub input: String,
    pub options: Vec<&'static str>,
}

impl fmt::Display for UnknownOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "`{}` is not one of: {}",
            self.input,
            self.options.join(", ")
        )
    }
}

impl std::error::Error for UnknownOption {}

/// Resolves input by key, label, or 1-based index, ignoring case.
fn resolve<T: Copy>(
    input: &str,
    all: &[T],
    key: fn(T) -> &'static str,
    label: fn(T) -> &'static str,
) -> Result<T, UnknownOption> {
    let normalized = input.trim().to_lowercase();
    if let Ok(index) = normalized.parse::<usize>() {
        if (1..=all.len()).contains(&index) {
            return Ok(all[index - 1]);
        }
    }
    all.iter()
        .copied()
        .find(|item| {
            key(*item).to_lowercase() == normalized || label(*item).to_lowercase() == normalized
        })
        .ok_or_else(|| UnknownOption {
            input: input.trim().to_string(),
            options: all.iter().map(|item| key(*item)).collect(),
        })
}

macro_rules! catalog_impls {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromStr for $ty {
                type Err = UnknownOption;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    resolve(s, &<$ty>::ALL, <$ty>::key, <$ty>::label)
                }
            }

            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.label())
                }
            }
        )*
    };
}

catalog_impls!(ServiceType, VehicleType, PaymentMethod, SpecialNeed);
