use contracts::shared::filters::{FilterCriterion, SavedFilter};
use leptos::prelude::*;
use serde_json::Value;
use uuid::Uuid;

/// Compact display form of a criterion value for filter chips
fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(format_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

/// Collapsible filter panel with a badge and chips for the active criteria
#[component]
pub fn FilterPanel(
    /// Whether the panel is expanded
    #[prop(into)]
    is_expanded: RwSignal<bool>,

    /// Active criteria of the screen
    #[prop(into)]
    criteria: Signal<Vec<FilterCriterion>>,

    /// Callback when a criterion chip is removed (by position)
    #[prop(into)]
    on_remove_criterion: Callback<usize>,

    /// Filter builder content (form fields)
    #[prop(into)]
    filter_content: ChildrenFn,
) -> impl IntoView {
    let toggle_expanded = move |_| {
        is_expanded.update(|e| *e = !*e);
    };

    view! {
        <div class="filter-panel">
            <div class="filter-panel-header" on:click=toggle_expanded>
                <svg
                    width="16"
                    height="16"
                    viewBox="0 0 24 24"
                    fill="none"
                    stroke="currentColor"
                    stroke-width="2"
                    stroke-linecap="round"
                    stroke-linejoin="round"
                    class=move || {
                        if is_expanded.get() {
                            "filter-panel__chevron filter-panel__chevron--expanded"
                        } else {
                            "filter-panel__chevron"
                        }
                    }
                >
                    <polyline points="6 9 12 15 18 9"></polyline>
                </svg>
                <span class="filter-panel__title">"Фильтры"</span>
                {move || {
                    let count = criteria.get().len();
                    if count > 0 {
                        view! {
                            <span class="badge badge--primary">{count}</span>
                        }.into_any()
                    } else {
                        view! { <></> }.into_any()
                    }
                }}
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
                    <div class="filter-panel-tags">
                        {move || criteria.get().into_iter().enumerate().map(|(index, criterion)| {
                            view! {
                                <FilterTag
                                    criterion=criterion
                                    on_remove=Callback::new(move |_| on_remove_criterion.run(index))
                                />
                            }
                        }).collect_view()}
                    </div>
                </div>
            </div>
        </div>
    }
}

/// One active criterion chip with a remove button
#[component]
pub fn FilterTag(
    /// Criterion shown in the chip
    criterion: FilterCriterion,
    /// Callback when remove is clicked
    on_remove: Callback<()>,
) -> impl IntoView {
    let text = criterion.label.clone().unwrap_or_else(|| {
        format!(
            "{} {} {}",
            criterion.field,
            criterion.operator.label(),
            format_value(&criterion.value)
        )
    });

    view! {
        <div class="filter-tag">
            <span>{text}</span>
            <svg
                width="12"
                height="12"
                viewBox="0 0 24 24"
                fill="none"
                stroke="currentColor"
                stroke-width="2"
                stroke-linecap="round"
                stroke-linejoin="round"
                class="filter-tag__remove"
                on:click=move |e| {
                    e.stop_propagation();
                    on_remove.run(());
                }
            >
                <line x1="18" y1="6" x2="6" y2="18"></line>
                <line x1="6" y1="6" x2="18" y2="18"></line>
            </svg>
        </div>
    }
}

/// Saved filter list of a module: load on click, set-default, delete and
/// save-current-as actions
#[component]
pub fn SavedFilterMenu(
    /// Saved filters of the module
    #[prop(into)]
    filters: Signal<Vec<SavedFilter>>,

    /// Callback when a saved filter is selected
    #[prop(into)]
    on_load: Callback<Uuid>,

    /// Callback when a saved filter is made the module default
    #[prop(into)]
    on_set_default: Callback<Uuid>,

    /// Callback when a saved filter is deleted
    #[prop(into)]
    on_delete: Callback<Uuid>,

    /// Callback to save the current criteria under the given name
    #[prop(into)]
    on_save: Callback<String>,
) -> impl IntoView {
    let (new_name, set_new_name) = signal(String::new());

    view! {
        <div class="saved-filter-menu">
            {move || filters.get().into_iter().map(|filter| {
                let id = filter.id;
                view! {
                    <div class="saved-filter-menu__row">
                        <span
                            class="saved-filter-menu__name"
                            on:click=move |_| on_load.run(id)
                            title=filter.description.clone().unwrap_or_default()
                        >
                            {filter.name.clone()}
                            {filter.is_default.then(|| view! {
                                <span class="badge">"по умолчанию"</span>
                            })}
                        </span>
                        <button
                            class="saved-filter-menu__action"
                            title="Сделать фильтром по умолчанию"
                            on:click=move |_| on_set_default.run(id)
                        >
                            "★"
                        </button>
                        <button
                            class="saved-filter-menu__action"
                            title="Удалить"
                            on:click=move |_| on_delete.run(id)
                        >
                            "✕"
                        </button>
                    </div>
                }
            }).collect_view()}

            <div class="saved-filter-menu__save">
                <input
                    type="text"
                    placeholder="Название фильтра"
                    prop:value=move || new_name.get()
                    on:input=move |ev| set_new_name.set(event_target_value(&ev))
                />
                <button on:click=move |_| {
                    let name = new_name.get_untracked();
                    if !name.trim().is_empty() {
                        on_save.run(name);
                        set_new_name.set(String::new());
                    }
                }>
                    "Сохранить"
                </button>
            </div>
        </div>
    }
}
