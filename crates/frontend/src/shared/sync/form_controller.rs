use super::codec::{to_form_values, to_wire_values, FieldKind, FormSchema, FormValues};
use super::error::SyncError;
use crate::shared::date_utils::{format_date_input, format_datetime_input};
use contracts::domain::common::lenient::scalar_text;
use contracts::domain::common::{decode_products, ResourceRecord, LINE_ITEM_FIELDS};
use serde_json::{Map, Value};

/// Target of the record form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditSession {
    Closed,
    /// New record, no backend identity yet
    AddingNew,
    Editing { natural_key: String, id: i64 },
}

impl EditSession {
    pub fn is_open(&self) -> bool {
        !matches!(self, EditSession::Closed)
    }
}

/// Form state of one screen: the edit session plus the flat field values.
///
/// Opening the form for add or edit always starts from a full reset, so no
/// value of a previous session leaks into the next one.
pub struct FormController {
    schema: FormSchema,
    session: EditSession,
    values: FormValues,
    autofill_token: u64,
}

impl FormController {
    pub fn new(schema: FormSchema) -> Self {
        Self {
            schema,
            session: EditSession::Closed,
            values: FormValues::new(),
            autofill_token: 0,
        }
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn value(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or_default()
    }

    fn reset(&mut self) {
        self.values = self
            .schema
            .fields
            .iter()
            .map(|f| (f.name.to_string(), String::new()))
            .collect();
        // any pending lookup belongs to the previous session
        self.autofill_token += 1;
    }

    pub fn open_for_add(&mut self) {
        self.reset();
        self.session = EditSession::AddingNew;
    }

    /// Pre-fill the natural key of a new record.
    /// Ignored unless the form is still adding a new record.
    pub fn apply_generated_identifier(&mut self, field: &str, identifier: String) -> bool {
        if self.session != EditSession::AddingNew {
            return false;
        }
        self.values.insert(field.to_string(), identifier);
        true
    }

    /// Fails without touching the form when the record has no natural key
    pub fn open_for_edit<R: ResourceRecord>(&mut self, record: &R) -> Result<(), SyncError> {
        if record.natural_key().trim().is_empty() {
            return Err(SyncError::Validation {
                missing: vec![R::natural_key_field().to_string()],
            });
        }
        let wire = match serde_json::to_value(record)? {
            Value::Object(map) => map,
            other => {
                return Err(SyncError::Decode(format!(
                    "{} is not an object: {}",
                    R::element_name(),
                    other
                )))
            }
        };
        self.reset();
        self.values.extend(to_form_values(&wire, &self.schema));
        self.session = EditSession::Editing {
            natural_key: record.natural_key().to_string(),
            id: record.id(),
        };
        Ok(())
    }

    pub fn close(&mut self) {
        self.session = EditSession::Closed;
        self.values.clear();
        self.autofill_token += 1;
    }

    pub fn set_value(&mut self, name: &str, value: impl Into<String>) {
        self.values.insert(name.to_string(), value.into());
    }

    /// Wire record made of the schema fields only
    pub fn collect(&self) -> Map<String, Value> {
        let entries: FormValues = self
            .schema
            .fields
            .iter()
            .map(|f| (f.name.to_string(), self.value(f.name).to_string()))
            .collect();
        to_wire_values(entries)
    }

    /// Required-field check; lists the missing field names in schema order
    pub fn validate(&self) -> Result<(), SyncError> {
        let missing: Vec<String> = self
            .schema
            .required_fields()
            .filter(|f| self.value(f.name).trim().is_empty())
            .map(|f| f.name.to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(SyncError::Validation { missing })
        }
    }

    /// Start a new auto-fill attempt; earlier tokens become stale
    pub fn begin_autofill(&mut self) -> u64 {
        self.autofill_token += 1;
        self.autofill_token
    }

    pub fn is_current(&self, token: u64) -> bool {
        self.session.is_open() && self.autofill_token == token
    }

    /// Overwrite the fields supplied by a lookup; fields it does not
    /// mention keep their value.
    pub fn apply_lookup(&mut self, supplied: &Map<String, Value>) {
        if !self.session.is_open() {
            return;
        }
        for (name, value) in supplied {
            if name == "products" {
                match decode_products(value) {
                    Ok(items) => {
                        if let Some(first) = items.first() {
                            for field in LINE_ITEM_FIELDS {
                                if let Some(v) = first.get(field) {
                                    self.values.insert(field.to_string(), v.to_string());
                                }
                            }
                        }
                    }
                    Err(e) => log::warn!("Ignoring undecodable line items from lookup: {}", e),
                }
                continue;
            }
            let Some(text) = scalar_text(value) else {
                continue;
            };
            let text = match self.schema.kind(name) {
                Some(FieldKind::Date) => format_date_input(&text),
                Some(FieldKind::DateTime) => format_datetime_input(&text),
                _ => text,
            };
            self.values.insert(name.clone(), text);
        }
    }
}
