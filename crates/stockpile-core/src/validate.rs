//! Request validation.
//!
//! Raw payloads deserialize loosely, then `validate()` checks every
//! declared constraint and reports all violations at once as
//! field-level errors. Validation is side-effect-free and runs at the
//! HTTP boundary, before any service call.

use serde::{Deserialize, Serialize};

use crate::item::{ItemId, ItemPatch, NewItem};

pub const NAME_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;

/// A single violated constraint on a named field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "field '{}': {}", self.field, self.message)
    }
}

/// Raw body of `POST /item`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateItemPayload {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
}

impl CreateItemPayload {
    /// Check every constraint; all violations are reported together.
    pub fn validate(self) -> Result<NewItem, Vec<FieldError>> {
        let mut errors = Vec::new();

        let name = match self.name {
            None => {
                errors.push(FieldError::new("name", "required field missing"));
                String::new()
            }
            Some(name) => {
                check_name(&name, &mut errors);
                name
            }
        };

        if let Some(ref description) = self.description {
            check_description(description, &mut errors);
        }

        let price = match self.price {
            None => {
                errors.push(FieldError::new("price", "required field missing"));
                0.0
            }
            Some(price) => {
                check_price(price, &mut errors);
                price
            }
        };

        if errors.is_empty() {
            Ok(NewItem {
                name,
                description: self.description,
                price,
            })
        } else {
            Err(errors)
        }
    }
}

/// Raw body of `PUT /item/{id}`. Every field is optional; absent
/// fields are left unchanged by the store. An explicit `null` is a
/// constraint violation, not "unchanged" (the two are distinguished
/// with a double `Option`: outer absent, inner null).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateItemPayload {
    #[serde(default, deserialize_with = "double_option")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub price: Option<Option<f64>>,
}

impl UpdateItemPayload {
    pub fn validate(self) -> Result<ItemPatch, Vec<FieldError>> {
        let mut errors = Vec::new();

        let name = reject_null("name", self.name, &mut errors);
        let description = reject_null("description", self.description, &mut errors);
        let price = reject_null("price", self.price, &mut errors);

        if let Some(ref name) = name {
            check_name(name, &mut errors);
        }
        if let Some(ref description) = description {
            check_description(description, &mut errors);
        }
        if let Some(price) = price {
            check_price(price, &mut errors);
        }

        if errors.is_empty() {
            Ok(ItemPatch {
                name,
                description,
                price,
            })
        } else {
            Err(errors)
        }
    }
}

/// Keep the inner value when present; flag an explicit null.
fn reject_null<T>(
    field: &str,
    value: Option<Option<T>>,
    errors: &mut Vec<FieldError>,
) -> Option<T> {
    match value {
        None => None,
        Some(Some(value)) => Some(value),
        Some(None) => {
            errors.push(FieldError::new(field, "must not be null"));
            None
        }
    }
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Raw body of `DELETE /item/batch`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteBatchPayload {
    pub ids: Option<Vec<ItemId>>,
}

impl DeleteBatchPayload {
    pub fn validate(self) -> Result<Vec<ItemId>, Vec<FieldError>> {
        match self.ids {
            None => Err(vec![FieldError::new("ids", "required field missing")]),
            Some(ids) => Ok(ids),
        }
    }
}

/// Coerce a path parameter into an [`ItemId`].
pub fn parse_item_id(raw: &str) -> Result<ItemId, FieldError> {
    match raw.parse::<ItemId>() {
        Ok(id) if id >= 0 => Ok(id),
        _ => Err(FieldError::new(
            "id",
            format!("expected a non-negative integer, got '{raw}'"),
        )),
    }
}

fn check_name(name: &str, errors: &mut Vec<FieldError>) {
    let len = name.chars().count();
    if len == 0 {
        errors.push(FieldError::new("name", "must not be empty"));
    } else if len > NAME_MAX_CHARS {
        errors.push(FieldError::new(
            "name",
            format!("must be at most {NAME_MAX_CHARS} characters"),
        ));
    }
}

fn check_description(description: &str, errors: &mut Vec<FieldError>) {
    if description.chars().count() > DESCRIPTION_MAX_CHARS {
        errors.push(FieldError::new(
            "description",
            format!("must be at most {DESCRIPTION_MAX_CHARS} characters"),
        ));
    }
}

fn check_price(price: f64, errors: &mut Vec<FieldError>) {
    if !price.is_finite() {
        errors.push(FieldError::new("price", "must be a finite number"));
    } else if price < 0.0 {
        errors.push(FieldError::new("price", "must not be negative"));
    }
}
