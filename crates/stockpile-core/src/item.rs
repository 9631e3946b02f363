use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned item identifier. Never reused after deletion.
pub type ItemId = i64;

/// The single business entity managed by this system.
///
/// `id`, `created_at`, and `updated_at` are store-managed; the three
/// business fields come from validated request payloads. Wire format
/// is camelCase JSON with `description` serialized as `null` when
/// absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated create payload. Produced by
/// [`crate::validate::CreateItemPayload::validate`], never built from
/// raw input directly.
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
}

/// A validated partial update. `None` means "leave the field
/// unchanged"; there is no way to null out `description` through a
/// patch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
}

impl ItemPatch {
    /// True when the patch carries no field at all (a valid no-op).
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.price.is_none()
    }
}
