use super::view_model::OperationDetailsViewModel;
use super::OPERATION_FORM;
use crate::shared::components::record_form::RecordForm;
use crate::shared::icons::icon;
use crate::shared::modal::Modal;
use leptos::prelude::*;

#[component]
pub fn OperationDetails(vm: OperationDetailsViewModel) -> impl IntoView {
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
        <Modal
            title=Signal::derive(move || vm.title())
            on_close=Callback::new(move |_| vm.cancel_command())
            footer=footer
        >
            <RecordForm
                schema=OPERATION_FORM
                values=vm.values()
                references=vm.references()
                on_input=Callback::new(move |(name, value): (String, String)| vm.set_field(name, value))
            />
        </Modal>
    }
}
