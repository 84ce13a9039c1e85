use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A single company record. Missing fields in incoming JSON default to
/// empty, so a minimal create request only has to carry a name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub country: String,
    pub website: String,
    pub phone: String,
}

impl Company {
    /// True when both records carry the same data, ignoring `id`.
    pub fn same_record(&self, other: &Company) -> bool {
        self.name == other.name
            && self.code == other.code
            && self.country == other.country
            && self.website == other.website
            && self.phone == other.phone
    }
}
