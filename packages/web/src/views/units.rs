//! Unit explorer: full-text search with an optional training package filter.

use api::{Unit, UnitQuery};
use dioxus::prelude::*;
use ui::use_session_store;

use super::session_ended;

use crate::Route;

#[component]
pub fn Units() -> Element {
    let store = use_session_store();
    let nav = use_navigator();
    let mut query = use_signal(UnitQuery::default);
    let mut search_text = use_signal(String::new);
    let mut package = use_signal(String::new);
    let mut units = use_signal(Vec::<Unit>::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    // Re-runs whenever the submitted query changes
    let _loader = use_resource(move || {
        let store = store.clone();
        let current = query();
        async move {
            loading.set(true);
            error.set(None);
            let token = store.token();
            match store.api().search_units(token.as_deref(), &current).await {
                Ok(found) => units.set(found),
                Err(e) if e.is_unauthorized() => {
                    if session_ended(&*store, token.as_deref(), e) {
                        nav.replace(Route::Login {});
                    }
                }
                Err(e) => {
                    tracing::error!("Unit search failed: {}", e);
                    error.set(Some("Failed to search units. Please try again.".to_string()));
                    units.set(Vec::new());
                }
            }
            loading.set(false);
        }
    });

    let handle_search = move |evt: FormEvent| {
        evt.prevent_default();
        query.set(UnitQuery::new(search_text()).with_package(package()));
    };

    let current = query();
    let has_previous = current.previous_page().is_some();
    let has_next = units.read().len() as u32 >= current.page_size;

    rsx! {
        h1 { "Units of competency" }

        form {
            class: "search-form",
            onsubmit: handle_search,
            input {
                r#type: "search",
                placeholder: "Search by code, title or keyword",
                value: search_text(),
                oninput: move |evt: FormEvent| search_text.set(evt.value()),
            }
            input {
                placeholder: "Training package (e.g. BSB)",
                value: package(),
                oninput: move |evt: FormEvent| package.set(evt.value()),
            }
            button { class: "btn btn-primary", r#type: "submit", "Search" }
        }

        if let Some(err) = error() {
            div { class: "alert alert-error", "{err}" }
        }

        if loading() {
            div { class: "page-loading", "Searching..." }
        } else if units.read().is_empty() {
            div { class: "alert alert-info", "No units found. Try adjusting your search." }
        } else {
            div {
                class: "card-grid",
                for unit in units() {
                    Link {
                        key: "{unit.id}",
                        class: "card unit-card",
                        to: Route::UnitDetail { id: unit.id.clone() },
                        div {
                            class: "card-header",
                            strong { {unit.code.clone()} }
                            if let Some(status) = &unit.status {
                                span { class: "badge", {status.clone()} }
                            }
                        }
                        h3 { {unit.title.clone()} }
                        p {
                            class: "muted",
                            {summary(unit.description.as_deref())}
                        }
                    }
                }
            }
        }

        div {
            class: "pagination",
            button {
                class: "btn",
                disabled: !has_previous,
                onclick: move |_| {
                    if let Some(previous) = query().previous_page() {
                        query.set(previous);
                    }
                },
                "Previous"
            }
            span { {format!("Page {}", current.page)} }
            button {
                class: "btn",
                disabled: !has_next,
                onclick: move |_| {
                    let next = query().next_page();
                    query.set(next);
                },
                "Next"
            }
        }
    }
}

fn summary(description: Option<&str>) -> String {
    match description {
        Some(text) if text.chars().count() > 100 => {
            format!("{}...", text.chars().take(100).collect::<String>())
        }
        Some(text) => text.to_string(),
        None => "No description available".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::summary;

    #[test]
    fn test_summary_truncates_long_descriptions() {
        let long = "a".repeat(120);
        let text = summary(Some(&long));
        assert_eq!(text.len(), 103);
        assert!(text.ends_with("..."));
        assert_eq!(summary(Some("Short.")), "Short.");
        assert_eq!(summary(None), "No description available");
    }
}
