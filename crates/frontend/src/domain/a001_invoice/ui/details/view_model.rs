use crate::shared::state::ScreenState;
use crate::shared::sync::{EditSession, FieldKind, FormField, FormSchema, FormValues};
use contracts::domain::a001_invoice::Invoice;
use contracts::domain::common::{ReferenceItem, ReferenceKind};
use leptos::prelude::*;
use std::collections::BTreeMap;

const STATUS_OPTIONS: &[(&str, &str)] = &[
    ("draft", "Draft"),
    ("confirmed", "Confirmed"),
    ("registered", "Registered"),
    ("paid", "Paid"),
    ("consolidated", "Consolidated"),
    ("cancelled", "Cancelled"),
];

/// Invoice form layout. `client` and `inv_date` are required.
pub const INVOICE_FORM: FormSchema = FormSchema {
    fields: &[
        FormField::new("inv_id", "Invoice ID", FieldKind::Text),
        FormField::new("operation_num", "Operation", FieldKind::Lookup(ReferenceKind::Operations)),
        FormField::new("client", "Client", FieldKind::Reference(ReferenceKind::Clients)).required(),
        FormField::new("inv_date", "Invoice Date", FieldKind::Date).required(),
        FormField::new("due_date", "Due Date", FieldKind::Date),
        FormField::new("currency", "Currency", FieldKind::Text),
        FormField::new("total", "Total", FieldKind::Number),
        FormField::new("tax_percentage", "Tax %", FieldKind::Number),
        FormField::new("status", "Status", FieldKind::Choice(STATUS_OPTIONS)),
        FormField::new("payment_method", "Payment Method", FieldKind::Text),
        FormField::new("payment_date", "Payment Date", FieldKind::Date),
        FormField::new("description", "Description", FieldKind::TextArea),
        FormField::new("notes", "Notes", FieldKind::TextArea),
        FormField::new("designation", "Designation", FieldKind::Text),
        FormField::new("quantity", "Quantity", FieldKind::Number),
        FormField::new("packages", "Packages", FieldKind::Number),
        FormField::new("weight", "Weight", FieldKind::Number),
        FormField::new("volume", "Volume", FieldKind::Number),
        FormField::new("unit_price", "Unit Price", FieldKind::Number),
    ],
};

/// Field whose value is looked up to fill the rest of the form
pub const AUTOFILL_FIELD: &str = "operation_num";

pub fn form_title(session: &EditSession) -> String {
    match session {
        EditSession::Editing { natural_key, .. } => format!("Edit Invoice {}", natural_key),
        _ => "New Invoice".to_string(),
    }
}

#[derive(Clone, Copy)]
pub struct InvoiceDetailsViewModel {
    screen: ScreenState<Invoice>,
}

impl InvoiceDetailsViewModel {
    pub fn new(screen: ScreenState<Invoice>) -> Self {
        Self { screen }
    }

    pub fn is_adding(&self) -> bool {
        self.screen.view.session.get() == EditSession::AddingNew
    }

    pub fn title(&self) -> String {
        self.screen.view.session.with(form_title)
    }

    pub fn values(&self) -> Signal<FormValues> {
        self.screen.view.form_values.into()
    }

    pub fn references(&self) -> Signal<BTreeMap<ReferenceKind, Vec<ReferenceItem>>> {
        self.screen.view.references.into()
    }

    /// Typing in the operation field schedules a debounced auto-fill
    pub fn set_field(&self, name: String, value: String) {
        self.screen.set_field(&name, value.clone());
        if name == AUTOFILL_FIELD {
            self.screen.schedule_autofill(value);
        }
    }

    /// Leaving the operation field (or picking one) fills immediately
    pub fn commit_field(&self, name: String, value: String) {
        if name == AUTOFILL_FIELD {
            self.screen.autofill_now(value);
        }
    }

    /// Switch between "INV" and "INVC" numbering for a new invoice
    pub fn switch_kind_command(&self, kind: &'static str) {
        self.screen.regenerate_identifier(kind);
    }

    pub fn save_command(&self) {
        self.screen.save();
    }

    pub fn cancel_command(&self) {
        self.screen.close_form();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_title() {
        assert_eq!(form_title(&EditSession::AddingNew), "New Invoice");
        assert_eq!(
            form_title(&EditSession::Editing {
                natural_key: "INV-0001".to_string(),
                id: 1
            }),
            "Edit Invoice INV-0001"
        );
    }

    #[test]
    fn test_schema_requires_client_and_date() {
        let required: Vec<&str> = INVOICE_FORM.required_fields().map(|f| f.name).collect();
        assert_eq!(required, vec!["client", "inv_date"]);
        assert_eq!(INVOICE_FORM.line_item_fields().count(), 6);
    }

    #[test]
    fn test_operation_field_is_typed_lookup() {
        assert_eq!(
            INVOICE_FORM.kind(AUTOFILL_FIELD),
            Some(FieldKind::Lookup(ReferenceKind::Operations))
        );
    }
}
