//! Booking draft model: the catalogs, the draft record, field identities,
//! typed edits, and the persisted snapshot format.

pub mod catalog;
pub mod draft;
pub mod field;
mod lenient;
pub mod snapshot;

pub use catalog::{PaymentMethod, ServiceType, SpecialNeed, UnknownOption, VehicleType};
pub use draft::{BookingDraft, Passengers, SpecialNeeds, TimeOfDay};
pub use field::{BookingField, FieldChange};
