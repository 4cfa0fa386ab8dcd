use serde::{Deserialize, Serialize};

/// Booking form as submitted by a player.
///
/// Every field is kept in its raw submitted shape so that validation can
/// report each problem back against the field it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub players: i32,
    #[serde(default)]
    pub contact_name: String,
    #[serde(default)]
    pub contact_phone: String,
    #[serde(default)]
    pub contact_email: String,
    #[serde(default)]
    pub terms_accepted: bool,
}
