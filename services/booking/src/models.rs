//! Booking models as exposed by the resource-allocation service

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, " {}"), self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }
    };
}

id_type!(
    /// Identifier of a bookable slot
    SlotId,
    "slot"
);
id_type!(
    /// Identifier of an appointment
    AppointmentId,
    "appointment"
);
id_type!(
    /// Identifier of a pet
    PetId,
    "pet"
);
id_type!(
    /// Identifier of a veterinarian
    VetId,
    "vet"
);

/// Availability of a slot
///
/// On the wire this is the boolean `isAvailable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotStatus {
    #[default]
    Free,
    Booked,
}

impl Serialize for SlotStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(*self == SlotStatus::Free)
    }
}

impl<'de> Deserialize<'de> for SlotStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let available = bool::deserialize(deserializer)?;
        Ok(if available {
            SlotStatus::Free
        } else {
            SlotStatus::Booked
        })
    }
}

/// Which availability listing to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    /// Slots offered for rescheduling existing appointments
    Priority,
    /// Slots offered for new appointments
    Regular,
}

/// A bookable unit of vet availability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub id: SlotId,
    pub date: NaiveDate,
    #[serde(with = "wire_time")]
    pub start_time: NaiveTime,
    #[serde(with = "wire_time")]
    pub end_time: NaiveTime,
    pub vet_id: VetId,
    /// Listings omit the flag for slots that are free
    #[serde(rename = "isAvailable", default)]
    pub status: SlotStatus,
    #[serde(rename = "isPriority", default)]
    pub priority: bool,
}

impl Slot {
    pub fn is_free(&self) -> bool {
        self.status == SlotStatus::Free
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}-{} ({})",
            self.id,
            self.date,
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M"),
            self.vet_id
        )
    }
}

/// Read view of an appointment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: AppointmentId,
    pub slot_id: SlotId,
    pub pet_id: PetId,
}

/// Times arrive as `HH:MM:SS` or, with zero seconds, as `HH:MM`
mod wire_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format("%H:%M:%S"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, "%H:%M:%S%.f")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M"))
            .map_err(D::Error::custom)
    }
}
