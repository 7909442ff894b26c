use contracts::domain::common::ReferenceItem;
use leptos::prelude::*;

/// Select component with label support
#[component]
pub fn Select(
    #[prop(optional, into)] label: MaybeProp<String>,
    #[prop(into)] value: Signal<String>,
    on_change: Callback<String>,
    /// `(value, label)` pairs
    #[prop(into)]
    options: Signal<Vec<(String, String)>>,
    /// Label of the leading empty option, e.g. "All"
    #[prop(optional, into)]
    empty_label: MaybeProp<String>,
    #[prop(optional)] required: bool,
    #[prop(optional, into)] id: MaybeProp<String>,
) -> impl IntoView {
    let select_id = move || id.get().unwrap_or_default();

    view! {
        <div class="form__group">
            {move || label.get().map(|l| view! {
                <label class="form__label" for=select_id>
                    {l}
                    {required.then(|| view! { <span class="form__required">" *"</span> })}
                </label>
            })}
            <select
                id=select_id
                class="form__select"
                required=required
                prop:value=move || value.get()
                on:change=move |ev| on_change.run(event_target_value(&ev))
            >
                {move || empty_label.get().map(|l| view! { <option value="">{l}</option> })}
                <For
                    each=move || options.get()
                    key=|(val, _)| val.clone()
                    children=move |(val, text)| {
                        let current = val.clone();
                        view! {
                            <option value=val selected=move || value.get() == current>
                                {text}
                            </option>
                        }
                    }
                />
            </select>
        </div>
    }
}

/// Option pairs for reference items matching `term`.
///
/// The current value stays listed even when it does not match, so the
/// select never silently loses its selection.
pub fn reference_options(items: &[ReferenceItem], term: &str, current: &str) -> Vec<(String, String)> {
    items
        .iter()
        .filter(|item| item.matches(term) || item.name == current)
        .map(|item| {
            let text = match &item.detail {
                Some(detail) => format!("{} ({})", item.name, detail),
                None => item.name.clone(),
            };
            (item.name.clone(), text)
        })
        .collect()
}

/// Select over a reference collection with a substring search box
#[component]
pub fn ReferenceSelect(
    #[prop(into)] label: String,
    #[prop(into)] value: Signal<String>,
    on_change: Callback<String>,
    #[prop(into)] items: Signal<Vec<ReferenceItem>>,
    #[prop(optional, into)] empty_label: MaybeProp<String>,
    #[prop(optional)] required: bool,
) -> impl IntoView {
    let term = RwSignal::new(String::new());
    let placeholder = format!("Search {}...", label.to_lowercase());
    let options = Signal::derive(move || {
        items.with(|items| reference_options(items, &term.get(), &value.get()))
    });

    view! {
        <div class="reference-select">
            <input
                type="search"
                class="form__input reference-select__search"
                placeholder=placeholder
                prop:value=move || term.get()
                on:input=move |ev| term.set(event_target_value(&ev))
            />
            <Select
                label=label
                value=value
                on_change=on_change
                options=options
                empty_label=empty_label
                required=required
            />
        </div>
    }
}
