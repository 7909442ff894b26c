use crate::shared::state::ScreenState;
use crate::shared::sync::{EditSession, FieldKind, FormField, FormSchema, FormValues};
use contracts::domain::a002_operation::Operation;
use contracts::domain::common::{ReferenceItem, ReferenceKind};
use leptos::prelude::*;
use std::collections::BTreeMap;

const FLUX_OPTIONS: &[(&str, &str)] = &[("import", "Import"), ("export", "Export")];

pub const OPERATION_FORM: FormSchema = FormSchema {
    fields: &[
        FormField::new("operation_num", "Operation No.", FieldKind::Text),
        FormField::new("client_name", "Client", FieldKind::Reference(ReferenceKind::Clients)).required(),
        FormField::new("operation_date", "Operation Date", FieldKind::Date).required(),
        FormField::new("reference", "Reference", FieldKind::Text),
        FormField::new("flux", "Flux", FieldKind::Choice(FLUX_OPTIONS)),
        FormField::new("vendor_name", "Vendor", FieldKind::Reference(ReferenceKind::Vendors)),
        FormField::new("shipper_city", "Shipper City", FieldKind::Text),
        FormField::new("receiver_city", "Receiver City", FieldKind::Text),
        FormField::new("positioning_date", "Positioning Date", FieldKind::Date),
        FormField::new("loading_date", "Loading Date", FieldKind::Date),
        FormField::new("eta", "ETA", FieldKind::DateTime),
        FormField::new("unloading_date", "Unloading", FieldKind::DateTime),
        FormField::new("sr", "SR", FieldKind::Text),
        FormField::new("cmr", "CMR", FieldKind::Text),
        FormField::new("description", "Description", FieldKind::TextArea),
        FormField::new("designation", "Designation", FieldKind::Text),
        FormField::new("quantity", "Quantity", FieldKind::Number),
        FormField::new("packages", "Packages", FieldKind::Number),
        FormField::new("weight", "Weight", FieldKind::Number),
        FormField::new("volume", "Volume", FieldKind::Number),
        FormField::new("unit_price", "Unit Price", FieldKind::Number),
    ],
};

fn form_title(session: &EditSession) -> String {
    match session {
        EditSession::Editing { natural_key, .. } => format!("Edit Operation {}", natural_key),
        _ => "New Operation".to_string(),
    }
}

#[derive(Clone, Copy)]
pub struct OperationDetailsViewModel {
    screen: ScreenState<Operation>,
}

impl OperationDetailsViewModel {
    pub fn new(screen: ScreenState<Operation>) -> Self {
        Self { screen }
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

    pub fn set_field(&self, name: String, value: String) {
        self.screen.set_field(&name, value);
    }

    pub fn save_command(&self) {
        self.screen.save();
    }

    pub fn cancel_command(&self) {
        self.screen.close_form();
    }
}
