use super::details::{InvoiceDetails, InvoiceDetailsViewModel, INVOICE_FORM};
use crate::shared::api_utils::api_client;
use crate::shared::components::filter_panel::{FilterPanel, FilterTag};
use crate::shared::components::ui::{DueBadge, InvoiceStatusBadge, ReferenceSelect, Select};
use crate::shared::config::AppConfig;
use crate::shared::date_utils::{due_indicator, format_opt_date, today, DueIndicator};
use crate::shared::icons::icon;
use crate::shared::state::ScreenState;
use crate::shared::sync::orchestrator::AutoFillSource;
use crate::shared::sync::{EditSession, FilterDef, ResourceClient, ScreenConfig};
use crate::shared::toast::ToastService;
use chrono::NaiveDate;
use contracts::domain::a001_invoice::{Invoice, InvoiceStatus};
use contracts::domain::a002_operation::Operation;
use contracts::domain::common::{ReferenceKind, ResourceRecord};
use leptos::prelude::*;
use std::rc::Rc;
use thaw::{Button, ButtonAppearance, ButtonSize, Spinner};

pub const INVOICE_FILTERS: &[FilterDef] = &[
    FilterDef::new("client", "Client"),
    FilterDef::new("status", "Status"),
    FilterDef::new("date_from", "From"),
    FilterDef::new("date_to", "To"),
    FilterDef::new("inv_id", "Invoice"),
    FilterDef::new("search", "Search"),
];

/// One table row, already formatted for display
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceRow {
    pub id: i64,
    pub inv_id: String,
    pub client: String,
    pub operation_num: String,
    pub inv_date: String,
    pub due_date: String,
    pub due: DueIndicator,
    pub total: String,
    pub currency: String,
    pub status: String,
    pub payment_method: String,
    pub can_confirm: bool,
    pub can_register: bool,
}

impl InvoiceRow {
    pub fn from_invoice(inv: &Invoice, today: NaiveDate) -> Self {
        let text = |v: &Option<String>| v.clone().filter(|s| !s.is_empty()).unwrap_or_else(|| "N/A".to_string());
        Self {
            id: inv.id,
            inv_id: inv.inv_id.clone(),
            client: text(&inv.client),
            operation_num: text(&inv.operation_num),
            inv_date: format_opt_date(inv.inv_date.as_deref()),
            due_date: format_opt_date(inv.due_date.as_deref()),
            due: due_indicator(inv.due_date.as_deref(), today),
            total: inv
                .total
                .as_ref()
                .and_then(|n| n.as_f64())
                .map(|t| format!("{:.2}", t))
                .unwrap_or_else(|| "N/A".to_string()),
            currency: inv.currency.clone().unwrap_or_default(),
            status: inv.status.clone(),
            payment_method: text(&inv.payment_method),
            can_confirm: inv.can_confirm(),
            can_register: inv.can_register(),
        }
    }
}

impl From<Invoice> for InvoiceRow {
    fn from(inv: Invoice) -> Self {
        Self::from_invoice(&inv, today())
    }
}

fn status_options() -> Vec<(String, String)> {
    InvoiceStatus::all()
        .into_iter()
        .map(|s| (s.code().to_string(), s.display_name().to_string()))
        .collect()
}

#[component]
pub fn InvoiceList() -> impl IntoView {
    let config = use_context::<AppConfig>().expect("AppConfig context not found");
    let toasts = use_context::<ToastService>().expect("ToastService context not found");

    let autofill: Rc<dyn AutoFillSource> =
        Rc::new(ResourceClient::<Operation>::new(api_client(&config)));
    let state = ScreenState::<Invoice>::mount(
        &config,
        toasts,
        ScreenConfig {
            schema: INVOICE_FORM,
            filters: INVOICE_FILTERS,
            login_url: config.login_url.clone(),
            server_messages: false,
        },
        Some(autofill),
    );
    let vm = InvoiceDetailsViewModel::new(state);

    let rows = move || {
        let today = today();
        state
            .view
            .records
            .with(|records| records.iter().map(|inv| InvoiceRow::from_invoice(inv, today)).collect::<Vec<_>>())
    };

    let filter_setter = move |name: &'static str| Callback::new(move |v: String| state.set_filter(name, v));

    let filter_content = ToChildren::to_children(move || {
        view! {
            <div class="filter-grid">
                <ReferenceSelect
                    label="Client"
                    value=Signal::derive(move || state.filter_value("client"))
                    on_change=filter_setter("client")
                    items=Signal::derive(move || state.view.reference(ReferenceKind::Clients))
                    empty_label="All"
                />
                <Select
                    label="Status"
                    value=Signal::derive(move || state.filter_value("status"))
                    on_change=filter_setter("status")
                    options=Signal::stored(status_options())
                    empty_label="All"
                />
                <div class="form__group">
                    <label class="form__label">"From"</label>
                    <input
                        type="date"
                        class="form__input"
                        prop:value=move || state.filter_value("date_from")
                        on:input=move |ev| state.set_filter("date_from", event_target_value(&ev))
                    />
                </div>
                <div class="form__group">
                    <label class="form__label">"To"</label>
                    <input
                        type="date"
                        class="form__input"
                        prop:value=move || state.filter_value("date_to")
                        on:input=move |ev| state.set_filter("date_to", event_target_value(&ev))
                    />
                </div>
                <div class="form__group">
                    <label class="form__label">"Invoice"</label>
                    <input
                        type="text"
                        class="form__input"
                        placeholder="INV-0001"
                        prop:value=move || state.filter_value("inv_id")
                        on:input=move |ev| state.set_filter("inv_id", event_target_value(&ev))
                    />
                </div>
                <div class="form__group">
                    <label class="form__label">"Search"</label>
                    <input
                        type="text"
                        class="form__input"
                        prop:value=move || state.filter_value("search")
                        on:input=move |ev| state.set_filter("search", event_target_value(&ev))
                        on:keydown=move |ev: web_sys::KeyboardEvent| {
                            if ev.key() == "Enter" {
                                state.apply_filters();
                            }
                        }
                    />
                </div>
            </div>
        }
    });

    let filter_tags = ToChildren::to_children(move || {
        view! {
            {move || {
                state
                    .active_filter_labels(INVOICE_FILTERS)
                    .into_iter()
                    .map(|(name, label)| {
                        view! {
                            <FilterTag label=label on_remove=Callback::new(move |_| state.clear_filter(name)) />
                        }
                    })
                    .collect_view()
            }}
        }
    });

    view! {
        <div class="page">
            <div class="page__header">
                <h1 class="page__title">{icon("invoices")} "Invoices"</h1>
                <div class="page__actions">
                    <Button appearance=ButtonAppearance::Primary on_click=move |_| state.open_for_add()>
                        {icon("plus")}
                        "New Invoice"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| state.reload()
                        disabled=state.view.loading
                    >
                        {icon("refresh")}
                        "Refresh"
                    </Button>
                </div>
            </div>

            <FilterPanel
                is_expanded=state.filters_expanded
                active_filters_count=Signal::derive(move || state.active_filter_count())
                on_apply=Callback::new(move |_| state.apply_filters())
                on_reset=Callback::new(move |_| state.reset_filters())
                filter_content=filter_content
                filter_tags=filter_tags
            />

            <Show when=move || state.view.loading.get()>
                <div class="list-loading">
                    <Spinner />
                    "Loading invoices..."
                </div>
            </Show>

            <table class="data-table">
                <thead>
                    <tr>
                        <th>"Invoice"</th>
                        <th>"Client"</th>
                        <th>"Operation"</th>
                        <th>"Date"</th>
                        <th>"Due Date"</th>
                        <th>"Days Left"</th>
                        <th class="text-right">"Total"</th>
                        <th>"Currency"</th>
                        <th>"Status"</th>
                        <th>"Payment"</th>
                        <th>"Actions"</th>
                    </tr>
                </thead>
                <tbody>
                    {move || {
                        let rows = rows();
                        if rows.is_empty() && !state.view.loading.get() {
                            return view! {
                                <tr>
                                    <td colspan="11" class="data-table__empty">"No invoices found"</td>
                                </tr>
                            }
                                .into_any();
                        }
                        rows.into_iter()
                            .map(|row| {
                                let id = row.id;
                                let key = row.inv_id.clone();
                                let confirm_key = key.clone();
                                view! {
                                    <tr>
                                        <td>
                                            <a href="#" on:click=move |ev| {
                                                ev.prevent_default();
                                                state.open_for_edit(id);
                                            }>{row.inv_id.clone()}</a>
                                        </td>
                                        <td>{row.client}</td>
                                        <td>{row.operation_num}</td>
                                        <td>{row.inv_date}</td>
                                        <td>{row.due_date}</td>
                                        <td><DueBadge indicator=row.due /></td>
                                        <td class="text-right">{row.total}</td>
                                        <td>{row.currency}</td>
                                        <td><InvoiceStatusBadge status=row.status /></td>
                                        <td>{row.payment_method}</td>
                                        <td class="data-table__actions">
                                            <Button
                                                appearance=ButtonAppearance::Transparent
                                                size=ButtonSize::Small
                                                on_click=move |_| state.open_for_edit(id)
                                            >
                                                {icon("edit")}
                                            </Button>
                                            {row.can_confirm.then(|| view! {
                                                <Button
                                                    appearance=ButtonAppearance::Transparent
                                                    size=ButtonSize::Small
                                                    on_click=move |_| state.confirm(id, &confirm_key)
                                                >
                                                    {icon("check")}
                                                </Button>
                                            })}
                                            {row.can_register.then(|| view! {
                                                <Button
                                                    appearance=ButtonAppearance::Transparent
                                                    size=ButtonSize::Small
                                                    on_click=move |_| state.register(id)
                                                >
                                                    {icon("register")}
                                                </Button>
                                            })}
                                            <Button
                                                appearance=ButtonAppearance::Transparent
                                                size=ButtonSize::Small
                                                on_click=move |_| state.delete(id, &key)
                                            >
                                                {icon("delete")}
                                            </Button>
                                        </td>
                                    </tr>
                                }
                            })
                            .collect_view()
                            .into_any()
                    }}
                </tbody>
            </table>

            <Show when=move || state.view.session.get() != EditSession::Closed>
                <InvoiceDetails vm=vm />
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn invoice(value: serde_json::Value) -> Invoice {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_row_formats_list_columns() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let row = InvoiceRow::from_invoice(
            &invoice(json!({
                "id": 1,
                "inv_id": "INV-0001",
                "client": "Acme",
                "status": "draft",
                "inv_date": "2025-01-05",
                "due_date": "2025-01-15",
                "total": 100
            })),
            today,
        );

        assert_eq!(row.inv_id, "INV-0001");
        assert_eq!(row.client, "Acme");
        assert_eq!(row.inv_date, "05/01/2025");
        assert_eq!(row.total, "100.00");
        assert_eq!(row.payment_method, "N/A");
        assert_eq!(row.due.variant, Some("warning"));
        assert!(row.can_confirm);
        assert!(!row.can_register);
    }

    #[test]
    fn test_row_without_total_or_client() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let row = InvoiceRow::from_invoice(
            &invoice(json!({"id": 2, "inv_id": "INV-0002", "status": "confirmed"})),
            today,
        );

        assert_eq!(row.total, "N/A");
        assert_eq!(row.client, "N/A");
        assert_eq!(row.operation_num, "N/A");
        assert_eq!(row.due.label, "N/A");
        assert!(!row.can_confirm);
        assert!(row.can_register);
    }

    #[test]
    fn test_filter_names() {
        let names: Vec<&str> = INVOICE_FILTERS.iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["client", "status", "date_from", "date_to", "inv_id", "search"]);
    }
}
