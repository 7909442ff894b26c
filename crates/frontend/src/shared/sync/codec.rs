//! Conversion between wire records and flat form values.
//!
//! Form values are always strings keyed by field name. Line items are
//! flattened: the first element of `products` fills the fixed
//! `LINE_ITEM_FIELDS`, and collecting a form folds those keys back into a
//! single-element `products` array.

use crate::shared::date_utils::{format_date_input, format_datetime_input};
use contracts::domain::common::lenient::scalar_text;
use contracts::domain::common::{decode_products, LineItem, ReferenceKind, LINE_ITEM_FIELDS};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub type FormValues = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    TextArea,
    Number,
    /// `<input type="date">`, "YYYY-MM-DD"
    Date,
    /// `<input type="datetime-local">`, "YYYY-MM-DDTHH:MM"
    DateTime,
    /// Dropdown fed by a reference collection
    Reference(ReferenceKind),
    /// Typed key of another record, with suggestions from a reference
    /// collection; drives auto-fill
    Lookup(ReferenceKind),
    /// Dropdown with fixed `(value, label)` options
    Choice(&'static [(&'static str, &'static str)]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FormField {
    pub const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn is_line_item(&self) -> bool {
        LineItem::is_line_item_field(self.name)
    }
}

/// Ordered field list of one resource form
#[derive(Debug, Clone, Copy)]
pub struct FormSchema {
    pub fields: &'static [FormField],
}

impl FormSchema {
    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn kind(&self, name: &str) -> Option<FieldKind> {
        self.field(name).map(|f| f.kind)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FormField> {
        self.fields.iter().filter(|f| f.required)
    }

    /// Fields outside the line-item block
    pub fn record_fields(&self) -> impl Iterator<Item = &FormField> {
        self.fields.iter().filter(|f| !f.is_line_item())
    }

    pub fn line_item_fields(&self) -> impl Iterator<Item = &FormField> {
        self.fields.iter().filter(|f| f.is_line_item())
    }
}

/// Flatten a wire record into form values.
///
/// Every scalar member is copied as text (`null` becomes ""). Date and
/// date-time fields of `schema` are reformatted for their input, unparsable
/// values become "". A `products` payload that fails to decode is logged and
/// leaves the line-item fields blank; this function never fails.
pub fn to_form_values(record: &Map<String, Value>, schema: &FormSchema) -> FormValues {
    let mut values = FormValues::new();

    for (name, value) in record {
        if name == "products" {
            continue;
        }
        let text = match value {
            Value::Null => String::new(),
            other => match scalar_text(other) {
                Some(t) => t,
                None => continue,
            },
        };
        let text = match schema.kind(name) {
            Some(FieldKind::Date) => format_date_input(&text),
            Some(FieldKind::DateTime) => format_datetime_input(&text),
            _ => text,
        };
        values.insert(name.clone(), text);
    }

    for field in LINE_ITEM_FIELDS {
        values.insert(field.to_string(), String::new());
    }
    if let Some(products) = record.get("products") {
        match decode_products(products) {
            Ok(items) => {
                if let Some(first) = items.first() {
                    for field in LINE_ITEM_FIELDS {
                        if let Some(v) = first.get(field) {
                            values.insert(field.to_string(), v.to_string());
                        }
                    }
                }
            }
            Err(e) => log::warn!("Could not decode line items, leaving them blank: {}", e),
        }
    }

    values
}

/// Fold flat form entries back into a wire record.
///
/// Line-item keys present in `entries` become the single element of
/// `products` and are removed from the top level. Everything else passes
/// through unchanged, empty strings included.
pub fn to_wire_values(entries: FormValues) -> Map<String, Value> {
    let mut record = Map::new();
    let mut item = Map::new();

    for (name, value) in entries {
        if LineItem::is_line_item_field(&name) {
            item.insert(name, Value::String(value));
        } else {
            record.insert(name, Value::String(value));
        }
    }

    if !item.is_empty() {
        record.insert("products".to_string(), Value::Array(vec![Value::Object(item)]));
    }
    record
}
