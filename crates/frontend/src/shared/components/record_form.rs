use crate::shared::components::ui::{ReferenceSelect, Select};
use crate::shared::sync::{FieldKind, FormField, FormSchema, FormValues};
use contracts::domain::common::{ReferenceItem, ReferenceKind};
use leptos::prelude::*;
use std::collections::BTreeMap;

type FieldEvent = Callback<(String, String)>;

fn input_type(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Number => "number",
        FieldKind::Date => "date",
        FieldKind::DateTime => "datetime-local",
        _ => "text",
    }
}

fn render_field(
    field: FormField,
    values: Signal<FormValues>,
    references: Signal<BTreeMap<ReferenceKind, Vec<ReferenceItem>>>,
    on_input: FieldEvent,
    on_commit: Option<FieldEvent>,
) -> AnyView {
    let name = field.name;
    let value = Signal::derive(move || values.with(|v| v.get(name).cloned().unwrap_or_default()));
    let commit = move |v: String| {
        if let Some(cb) = on_commit {
            cb.run((name.to_string(), v));
        }
    };
    let label = view! {
        <label class="form__label" for=name>
            {field.label}
            {field.required.then(|| view! { <span class="form__required">" *"</span> })}
        </label>
    };

    match field.kind {
        FieldKind::Reference(kind) => {
            let items = Signal::derive(move || {
                references.with(|r| r.get(&kind).cloned().unwrap_or_default())
            });
            let on_change = Callback::new(move |v: String| {
                on_input.run((name.to_string(), v.clone()));
                commit(v);
            });
            view! {
                <ReferenceSelect
                    label=field.label
                    value=value
                    on_change=on_change
                    items=items
                    empty_label="Select..."
                    required=field.required
                />
            }
            .into_any()
        }
        FieldKind::Lookup(kind) => {
            let list_id = format!("{}-options", name);
            let items = Signal::derive(move || {
                references.with(|r| r.get(&kind).cloned().unwrap_or_default())
            });
            view! {
                <div class="form__group">
                    {label}
                    <input
                        id=name
                        class="form__input"
                        type="text"
                        list=list_id.clone()
                        autocomplete="off"
                        required=field.required
                        prop:value=move || value.get()
                        on:input=move |ev| on_input.run((name.to_string(), event_target_value(&ev)))
                        on:change=move |ev| commit(event_target_value(&ev))
                    />
                    <datalist id=list_id>
                        {move || {
                            items
                                .get()
                                .into_iter()
                                .map(|item| view! {
                                    <option value=item.name>{item.detail.unwrap_or_default()}</option>
                                })
                                .collect_view()
                        }}
                    </datalist>
                </div>
            }
            .into_any()
        }
        FieldKind::Choice(options) => {
            let options: Vec<(String, String)> = options
                .iter()
                .map(|(v, l)| (v.to_string(), l.to_string()))
                .collect();
            view! {
                <Select
                    label=field.label
                    id=name
                    value=value
                    on_change=Callback::new(move |v: String| on_input.run((name.to_string(), v)))
                    options=Signal::stored(options)
                    empty_label="Select..."
                    required=field.required
                />
            }
            .into_any()
        }
        FieldKind::TextArea => view! {
            <div class="form__group">
                {label}
                <textarea
                    id=name
                    class="form__textarea"
                    rows="3"
                    prop:value=move || value.get()
                    on:input=move |ev| on_input.run((name.to_string(), event_target_value(&ev)))
                />
            </div>
        }
        .into_any(),
        kind => view! {
            <div class="form__group">
                {label}
                <input
                    id=name
                    class="form__input"
                    type=input_type(kind)
                    step=(kind == FieldKind::Number).then_some("any")
                    required=field.required
                    prop:value=move || value.get()
                    on:input=move |ev| on_input.run((name.to_string(), event_target_value(&ev)))
                    on:change=move |ev| commit(event_target_value(&ev))
                />
            </div>
        }
        .into_any(),
    }
}

/// Form rendered from a [`FormSchema`].
///
/// `on_input` fires on every keystroke, `on_commit` on change/blur and on
/// dropdown selection.
#[component]
pub fn RecordForm(
    schema: FormSchema,
    #[prop(into)] values: Signal<FormValues>,
    #[prop(into)] references: Signal<BTreeMap<ReferenceKind, Vec<ReferenceItem>>>,
    on_input: FieldEvent,
    #[prop(optional)] on_commit: Option<FieldEvent>,
) -> impl IntoView {
    let record_fields = schema
        .record_fields()
        .map(|f| render_field(*f, values, references, on_input, on_commit))
        .collect_view();
    let line_item_fields = schema
        .line_item_fields()
        .map(|f| render_field(*f, values, references, on_input, on_commit))
        .collect_view();

    view! {
        <form class="details-form" on:submit=|ev| ev.prevent_default()>
            <div class="form__grid">{record_fields}</div>
            <fieldset class="form__section">
                <legend class="form__section-title">"Line item"</legend>
                <div class="form__grid">{line_item_fields}</div>
            </fieldset>
        </form>
    }
}
