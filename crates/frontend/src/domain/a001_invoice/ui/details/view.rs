use super::view_model::InvoiceDetailsViewModel;
use super::INVOICE_FORM;
use crate::shared::components::record_form::RecordForm;
use crate::shared::icons::icon;
use crate::shared::modal::Modal;
use contracts::domain::a001_invoice::Invoice;
use contracts::domain::common::ResourceRecord;
use leptos::prelude::*;

#[component]
pub fn InvoiceDetails(vm: InvoiceDetailsViewModel) -> impl IntoView {
    let on_close = Callback::new(move |_| vm.cancel_command());
    let on_input = Callback::new(move |(name, value): (String, String)| vm.set_field(name, value));
    let on_commit =
        Callback::new(move |(name, value): (String, String)| vm.commit_field(name, value));

    let footer = ToChildren::to_children(move || {
        view! {
            <button class="button button--secondary" on:click=move |_| vm.cancel_command()>
                "Cancel"
            </button>
            <button class="button button--primary" on:click=move |_| vm.save_command()>
                {icon("save")}
                "Save"
            </button>
        }
    });

    view! {
        <Modal title=Signal::derive(move || vm.title()) on_close=on_close footer=footer>
            <Show when=move || vm.is_adding()>
                <div class="details-kind-switch">
                    <span class="form__label">"Numbering"</span>
                    {Invoice::identifier_kinds()
                        .iter()
                        .copied()
                        .map(|kind| {
                            view! {
                                <button
                                    class="button button--secondary button--small"
                                    on:click=move |_| vm.switch_kind_command(kind)
                                >
                                    {kind}
                                </button>
                            }
                        })
                        .collect_view()}
                </div>
            </Show>
            <RecordForm
                schema=INVOICE_FORM
                values=vm.values()
                references=vm.references()
                on_input=on_input
                on_commit=on_commit
            />
        </Modal>
    }
}
