use api::{Unit, UnitElements};
use dioxus::prelude::*;
use ui::{use_session, use_session_store};

use super::{action_error, session_ended};
use crate::Route;

#[component]
pub fn UnitDetail(id: String) -> Element {
    let state = use_session();
    let store = use_session_store();
    let nav = use_navigator();
    // Track the id in a signal so the loader re-runs on route param change
    let mut id_signal = use_signal(|| id.clone());
    if *id_signal.peek() != id {
        id_signal.set(id.clone());
    }
    let mut unit = use_signal(|| Option::<Unit>::None);
    let mut elements = use_signal(UnitElements::default);
    let mut error = use_signal(|| Option::<String>::None);
    let mut sync_message = use_signal(|| Option::<String>::None);
    let mut syncing = use_signal(|| false);

    let loader_store = store.clone();
    let _loader = use_resource(move || {
        let store = loader_store.clone();
        let id = id_signal();
        async move {
            error.set(None);
            let token = store.token();
            match store.api().get_unit(token.as_deref(), &id).await {
                Ok(found) => unit.set(Some(found)),
                Err(e) if e.is_unauthorized() => {
                    if session_ended(&*store, token.as_deref(), e) {
                        nav.replace(Route::Login {});
                    }
                    return;
                }
                Err(e) if e.is_not_found() => {
                    unit.set(None);
                    error.set(Some("This unit does not exist.".to_string()));
                    return;
                }
                Err(e) => {
                    tracing::error!("Failed to load unit {}: {}", id, e);
                    error.set(Some("Could not load this unit. Please try again.".to_string()));
                    return;
                }
            }
            // Missing content is shown as such rather than failing the page.
            match store.api().unit_elements(token.as_deref(), &id).await {
                Ok(found) => elements.set(found),
                Err(e) => {
                    tracing::warn!("Failed to load elements for unit {}: {}", id, e);
                    elements.set(UnitElements::default());
                }
            }
        }
    });

    let sync = move |code: String| {
        let store = store.clone();
        spawn(async move {
            syncing.set(true);
            sync_message.set(None);
            let client = store.api().clone();
            let result = store
                .authorized(move |token| async move { client.sync_unit(&token, &code).await })
                .await;
            match result {
                Ok(ack) => sync_message.set(Some(
                    ack.message
                        .unwrap_or_else(|| "Sync started.".to_string()),
                )),
                Err(e) => sync_message.set(action_error(&e)),
            }
            syncing.set(false);
        });
    };

    let is_admin = state().session.is_admin();

    rsx! {
        Link { class: "btn btn-link", to: Route::Units {}, "Back to units" }

        if let Some(err) = error() {
            div { class: "alert alert-error", "{err}" }
        } else if let Some(unit) = unit() {
            article {
                class: "unit-detail",
                p { class: "muted", {unit.code.clone()} }
                h1 { {unit.title.clone()} }
                dl {
                    if let Some(status) = &unit.status {
                        dt { "Status" }
                        dd { {status.clone()} }
                    }
                    if let Some(released) = &unit.release_date {
                        dt { "Released" }
                        dd { {released.clone()} }
                    }
                    if let Some(hours) = unit.nominal_hours {
                        dt { "Nominal hours" }
                        dd { {hours.to_string()} }
                    }
                }
                p {
                    {unit.description.clone().unwrap_or_else(|| "No description available".to_string())}
                }

                if is_admin {
                    div {
                        class: "form-row",
                        button {
                            class: "btn",
                            disabled: syncing(),
                            onclick: {
                                let code = unit.code.clone();
                                let sync = sync.clone();
                                move |_| sync(code.clone())
                            },
                            if syncing() { "Syncing..." } else { "Sync from register" }
                        }
                    }
                    if let Some(message) = sync_message() {
                        div { class: "alert alert-info", "{message}" }
                    }
                }

                h2 { "Elements and performance criteria" }
                if elements.read().elements.is_empty() {
                    p { class: "muted", "No elements available" }
                }
                for element in elements().elements {
                    div {
                        key: "{element.element_num}",
                        class: "card element",
                        h3 { {format!("Element {}: {}", element.element_num, element.element_text)} }
                        if element.performance_criteria.is_empty() {
                            p { class: "muted", "No performance criteria available" }
                        } else {
                            ul {
                                for pc in element.performance_criteria {
                                    li {
                                        key: "{pc.pc_num}",
                                        strong { {format!("{} ", pc.pc_num)} }
                                        {pc.pc_text}
                                    }
                                }
                            }
                        }
                    }
                }
            }
        } else {
            div { class: "page-loading", "Loading..." }
        }
    }
}
