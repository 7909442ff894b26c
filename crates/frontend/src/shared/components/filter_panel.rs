use crate::shared::icons::icon;
use leptos::prelude::*;

/// Collapsible filter panel with Apply / Reset actions
#[component]
pub fn FilterPanel(
    #[prop(into)] is_expanded: RwSignal<bool>,
    /// Number of non-empty filters, shown as a badge
    #[prop(into)]
    active_filters_count: Signal<usize>,
    on_apply: Callback<()>,
    on_reset: Callback<()>,
    /// Filter controls
    filter_content: ChildrenFn,
    /// Active filter chips
    #[prop(optional)]
    filter_tags: Option<ChildrenFn>,
) -> impl IntoView {
    let toggle_expanded = move |_| is_expanded.update(|e| *e = !*e);

    view! {
        <div class="filter-panel">
            <div class="filter-panel-header">
                <div class="filter-panel-header__left" on:click=toggle_expanded>
                    {icon("filter")}
                    <span class="filter-panel__title">"Filters"</span>
                    {move || {
                        let count = active_filters_count.get();
                        (count > 0).then(|| view! { <span class="badge badge--primary">{count}</span> })
                    }}
                </div>
                <div class="filter-panel-header__actions">
                    <button class="button button--primary" on:click=move |_| on_apply.run(())>
                        {icon("filter")}
                        "Apply"
                    </button>
                    <button class="button button--secondary" on:click=move |_| on_reset.run(())>
                        {icon("x")}
                        "Reset"
                    </button>
                </div>
            </div>

            <div class=move || {
                if is_expanded.get() {
                    "filter-panel__collapsible filter-panel__collapsible--expanded"
                } else {
                    "filter-panel__collapsible filter-panel__collapsible--collapsed"
                }
            }>
                <div class="filter-panel-content">
                    {filter_content()}
                </div>
            </div>
            {filter_tags.map(|tags| view! { <div class="filter-panel__tags">{tags()}</div> })}
        </div>
    }
}

/// Active filter chip; the cross clears that filter
#[component]
pub fn FilterTag(#[prop(into)] label: String, on_remove: Callback<()>) -> impl IntoView {
    view! {
        <div class="filter-tag">
            <span>{label}</span>
            <span
                class="filter-tag__remove"
                on:click=move |e| {
                    e.stop_propagation();
                    on_remove.run(());
                }
            >
                {icon("x")}
            </span>
        </div>
    }
}
