use super::details::{OperationDetails, OperationDetailsViewModel, OPERATION_FORM};
use crate::shared::components::filter_panel::{FilterPanel, FilterTag};
use crate::shared::components::ui::{ConfirmationBadge, ReferenceSelect, Select};
use crate::shared::config::AppConfig;
use crate::shared::date_utils::{format_datetime, format_opt_date};
use crate::shared::icons::icon;
use crate::shared::state::ScreenState;
use crate::shared::sync::{EditSession, FilterDef, ScreenConfig};
use crate::shared::toast::ToastService;
use contracts::domain::a002_operation::Operation;
use contracts::domain::common::{ReferenceKind, ResourceRecord};
use leptos::prelude::*;
use thaw::{Button, ButtonAppearance, ButtonSize, Spinner};

pub const OPERATION_FILTERS: &[FilterDef] = &[
    FilterDef::new("client_name", "Client"),
    FilterDef::new("vendor_name", "Vendor"),
    FilterDef::new("status", "Status"),
    FilterDef::new("date_from", "From"),
    FilterDef::new("date_to", "To"),
    FilterDef::new("operation_num", "Operation"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct OperationRow {
    pub id: i64,
    pub operation_num: String,
    pub client_name: String,
    pub operation_date: String,
    pub reference: String,
    pub flux: String,
    /// "Shipper -> Receiver"
    pub route: String,
    pub vendor_name: String,
    pub eta: String,
    pub is_confirmed: bool,
    pub can_confirm: bool,
}

impl From<&Operation> for OperationRow {
    fn from(op: &Operation) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        let route = match (op.shipper_city.as_deref(), op.receiver_city.as_deref()) {
            (Some(from), Some(to)) => format!("{} -> {}", from, to),
            (Some(city), None) | (None, Some(city)) => city.to_string(),
            (None, None) => String::new(),
        };
        Self {
            id: op.id,
            operation_num: op.operation_num.clone(),
            client_name: text(&op.client_name),
            operation_date: format_opt_date(op.operation_date.as_deref()),
            reference: text(&op.reference),
            flux: text(&op.flux),
            route,
            vendor_name: text(&op.vendor_name),
            eta: op
                .eta
                .as_deref()
                .map(format_datetime)
                .unwrap_or_else(|| "N/A".to_string()),
            is_confirmed: op.is_confirmed,
            can_confirm: op.can_confirm(),
        }
    }
}

fn status_options() -> Vec<(String, String)> {
    vec![
        ("confirmed".to_string(), "Confirmed".to_string()),
        ("unconfirmed".to_string(), "Not Confirmed".to_string()),
    ]
}

#[component]
pub fn OperationList() -> impl IntoView {
    let config = use_context::<AppConfig>().expect("AppConfig context not found");
    let toasts = use_context::<ToastService>().expect("ToastService context not found");

    let state = ScreenState::<Operation>::mount(
        &config,
        toasts,
        ScreenConfig {
            schema: OPERATION_FORM,
            filters: OPERATION_FILTERS,
            login_url: config.login_url.clone(),
            server_messages: true,
        },
        None,
    );
    let vm = OperationDetailsViewModel::new(state);

    let filter_setter = move |name: &'static str| Callback::new(move |v: String| state.set_filter(name, v));
    let date_input = move |name: &'static str, label: &'static str| {
        view! {
            <div class="form__group">
                <label class="form__label">{label}</label>
                <input
                    type="date"
                    class="form__input"
                    prop:value=move || state.filter_value(name)
                    on:input=move |ev| state.set_filter(name, event_target_value(&ev))
                />
            </div>
        }
    };

    let filter_content = ToChildren::to_children(move || {
        view! {
            <div class="filter-grid">
                <ReferenceSelect
                    label="Client"
                    value=Signal::derive(move || state.filter_value("client_name"))
                    on_change=filter_setter("client_name")
                    items=Signal::derive(move || state.view.reference(ReferenceKind::Clients))
                    empty_label="All"
                />
                <ReferenceSelect
                    label="Vendor"
                    value=Signal::derive(move || state.filter_value("vendor_name"))
                    on_change=filter_setter("vendor_name")
                    items=Signal::derive(move || state.view.reference(ReferenceKind::Vendors))
                    empty_label="All"
                />
                <Select
                    label="Status"
                    value=Signal::derive(move || state.filter_value("status"))
                    on_change=filter_setter("status")
                    options=Signal::stored(status_options())
                    empty_label="All"
                />
                {date_input("date_from", "From")}
                {date_input("date_to", "To")}
                <div class="form__group">
                    <label class="form__label">"Operation"</label>
                    <input
                        type="text"
                        class="form__input"
                        prop:value=move || state.filter_value("operation_num")
                        on:input=move |ev| state.set_filter("operation_num", event_target_value(&ev))
                    />
                </div>
            </div>
        }
    });

    let filter_tags = ToChildren::to_children(move || {
        view! {
            {move || {
                state
                    .active_filter_labels(OPERATION_FILTERS)
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
                <h1 class="page__title">{icon("operations")} "Operations"</h1>
                <div class="page__actions">
                    <Button appearance=ButtonAppearance::Primary on_click=move |_| state.open_for_add()>
                        {icon("plus")}
                        "New Operation"
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
                    "Loading operations..."
                </div>
            </Show>

            <table class="data-table">
                <thead>
                    <tr>
                        <th>"Operation"</th>
                        <th>"Client"</th>
                        <th>"Date"</th>
                        <th>"Reference"</th>
                        <th>"Flux"</th>
                        <th>"Route"</th>
                        <th>"Vendor"</th>
                        <th>"ETA"</th>
                        <th>"Status"</th>
                        <th>"Actions"</th>
                    </tr>
                </thead>
                <tbody>
                    {move || {
                        let rows: Vec<OperationRow> =
                            state.view.records.with(|ops| ops.iter().map(OperationRow::from).collect());
                        if rows.is_empty() && !state.view.loading.get() {
                            return view! {
                                <tr>
                                    <td colspan="10" class="data-table__empty">"No operations found"</td>
                                </tr>
                            }
                                .into_any();
                        }
                        rows.into_iter()
                            .map(|row| {
                                let id = row.id;
                                let key = row.operation_num.clone();
                                let confirm_key = key.clone();
                                view! {
                                    <tr>
                                        <td>
                                            <a href="#" on:click=move |ev| {
                                                ev.prevent_default();
                                                state.open_for_edit(id);
                                            }>{row.operation_num.clone()}</a>
                                        </td>
                                        <td>{row.client_name}</td>
                                        <td>{row.operation_date}</td>
                                        <td>{row.reference}</td>
                                        <td>{row.flux}</td>
                                        <td>{row.route}</td>
                                        <td>{row.vendor_name}</td>
                                        <td>{row.eta}</td>
                                        <td><ConfirmationBadge confirmed=row.is_confirmed /></td>
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
                <OperationDetails vm=vm />
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_from_operation() {
        let op: Operation = serde_json::from_value(json!({
            "id": 5,
            "operation_num": "OP-0005",
            "client_name": "Acme",
            "operation_date": "2025-02-01",
            "shipper_city": "Casablanca",
            "receiver_city": "Lyon",
            "eta": "2025-02-03 14:30:00",
            "is_confirmed": false
        }))
        .unwrap();

        let row = OperationRow::from(&op);
        assert_eq!(row.operation_num, "OP-0005");
        assert_eq!(row.operation_date, "01/02/2025");
        assert_eq!(row.route, "Casablanca -> Lyon");
        assert_eq!(row.eta, "03/02/2025 14:30:00");
        assert!(row.can_confirm);
    }

    #[test]
    fn test_confirmed_row_hides_confirm() {
        let op: Operation = serde_json::from_value(json!({
            "id": 6, "operation_num": "OP-0006", "is_confirmed": 1
        }))
        .unwrap();

        let row = OperationRow::from(&op);
        assert!(row.is_confirmed);
        assert!(!row.can_confirm);
        assert_eq!(row.eta, "N/A");
        assert_eq!(row.route, "");
    }
}
