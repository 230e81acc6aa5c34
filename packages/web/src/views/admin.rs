//! Admin dashboard: browse the national register, queue imports and follow
//! the resulting download jobs. Only reachable for admin sessions.

use std::collections::BTreeSet;

use api::{CatalogueKind, CataloguePage, DownloadJob, JobStatus};
use dioxus::prelude::*;
use ui::{use_session, use_session_store};

use super::action_error;
use crate::Route;

/// Flip `code` in the selection.
fn toggle(selection: &mut BTreeSet<String>, code: &str) {
    if !selection.remove(code) {
        selection.insert(code.to_string());
    }
}

#[component]
pub fn Admin() -> Element {
    let state = use_session();
    let store = use_session_store();
    let mut kind = use_signal(|| CatalogueKind::TrainingPackages);
    let mut page = use_signal(|| 1u32);
    let mut package_filter = use_signal(String::new);
    let mut applied_filter = use_signal(String::new);
    let mut listing = use_signal(CataloguePage::default);
    let mut selected = use_signal(BTreeSet::<String>::new);
    let mut job = use_signal(|| Option::<(CatalogueKind, DownloadJob)>::None);
    let mut job_status = use_signal(|| Option::<JobStatus>::None);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);
    let mut sync_code = use_signal(String::new);
    let mut sync_message = use_signal(|| Option::<String>::None);

    let loader_store = store.clone();
    let _loader = use_resource(move || {
        let store = loader_store.clone();
        let kind = kind();
        let page = page();
        let filter = applied_filter();
        async move {
            loading.set(true);
            error.set(None);
            let client = store.api().clone();
            let result = store
                .authorized(move |token| async move {
                    client.available(&token, kind, page, Some(filter.as_str())).await
                })
                .await;
            match result {
                Ok(found) => listing.set(found),
                Err(e) => {
                    listing.set(CataloguePage::default());
                    error.set(action_error(&e));
                }
            }
            loading.set(false);
        }
    });

    let download_store = store.clone();
    let start_download = move |_: MouseEvent| {
        let store = download_store.clone();
        let kind = kind();
        let codes: Vec<String> = selected.read().iter().cloned().collect();
        if codes.is_empty() {
            return;
        }
        spawn(async move {
            error.set(None);
            let client = store.api().clone();
            let result = store
                .authorized(move |token| async move {
                    client.bulk_download(&token, kind, &codes).await
                })
                .await;
            match result {
                Ok(started) => {
                    tracing::info!("Queued download job {}", started.job_id);
                    selected.write().clear();
                    job_status.set(None);
                    job.set(Some((kind, started)));
                }
                Err(e) => error.set(action_error(&e)),
            }
        });
    };

    let status_store = store.clone();
    let check_status = move |_: MouseEvent| {
        let store = status_store.clone();
        let Some((kind, started)) = job() else {
            return;
        };
        spawn(async move {
            let client = store.api().clone();
            let result = store
                .authorized(move |token| async move {
                    client.download_status(&token, kind, &started.job_id).await
                })
                .await;
            match result {
                Ok(status) => job_status.set(Some(status)),
                Err(e) => error.set(action_error(&e)),
            }
        });
    };

    let sync_unit = move |evt: FormEvent| {
        evt.prevent_default();
        let store = store.clone();
        let code = sync_code().trim().to_string();
        if code.is_empty() {
            return;
        }
        spawn(async move {
            sync_message.set(None);
            let client = store.api().clone();
            let result = store
                .authorized(move |token| async move { client.sync_unit(&token, &code).await })
                .await;
            match result {
                Ok(ack) => {
                    sync_message.set(Some(ack.message.unwrap_or_else(|| "Sync started.".to_string())));
                    sync_code.set(String::new());
                }
                Err(e) => sync_message.set(action_error(&e)),
            }
        });
    };

    let name = state()
        .session
        .user()
        .map(|user| user.display_name())
        .unwrap_or_default();
    let current = listing();
    let current_kind = kind();
    let has_next = current.entries.len() as u32 >= current.page_size;

    rsx! {
        section {
            class: "admin",
            h1 { "Administration" }
            p { class: "muted", "Signed in as {name}" }

            if let Some(err) = error() {
                div { class: "alert alert-error", "{err}" }
            }

            div {
                class: "form-row",
                for option in [CatalogueKind::TrainingPackages, CatalogueKind::Units] {
                    button {
                        key: "{option.label()}",
                        class: if option == current_kind { "btn btn-primary" } else { "btn" },
                        onclick: move |_| {
                            if kind() != option {
                                selected.write().clear();
                                page.set(1);
                                kind.set(option);
                            }
                        },
                        {option.label()}
                    }
                }
            }

            if current_kind == CatalogueKind::Units {
                form {
                    class: "search-form",
                    onsubmit: move |evt: FormEvent| {
                        evt.prevent_default();
                        page.set(1);
                        applied_filter.set(package_filter());
                    },
                    input {
                        placeholder: "Training package (e.g. BSB)",
                        value: package_filter(),
                        oninput: move |evt: FormEvent| package_filter.set(evt.value()),
                    }
                    button { class: "btn", r#type: "submit", "Filter" }
                }
            }

            if loading() {
                div { class: "page-loading", "Loading catalogue..." }
            } else if current.entries.is_empty() {
                div { class: "alert alert-info", "Nothing available on this page." }
            } else {
                table {
                    class: "catalogue",
                    thead {
                        tr {
                            th {}
                            th { "Code" }
                            th { "Title" }
                            th { "Status" }
                            th { "Imported" }
                        }
                    }
                    tbody {
                        for entry in current.entries.clone() {
                            tr {
                                key: "{entry.code}",
                                td {
                                    input {
                                        r#type: "checkbox",
                                        checked: selected.read().contains(&entry.code),
                                        onchange: {
                                            let code = entry.code.clone();
                                            move |_| toggle(&mut selected.write(), &code)
                                        },
                                    }
                                }
                                td { {entry.code.clone()} }
                                td { {entry.title.clone().unwrap_or_default()} }
                                td { {entry.status.clone().unwrap_or_default()} }
                                td {
                                    if entry.is_processed() {
                                        "Processed"
                                    } else if entry.in_database {
                                        "Pending"
                                    } else {
                                        "No"
                                    }
                                }
                            }
                        }
                    }
                }
            }

            div {
                class: "pagination",
                button {
                    class: "btn",
                    disabled: page() <= 1,
                    onclick: move |_| page.set(page().saturating_sub(1).max(1)),
                    "Previous"
                }
                span { {format!("Page {}", page())} }
                button {
                    class: "btn",
                    disabled: !has_next,
                    onclick: move |_| page += 1,
                    "Next"
                }
                button {
                    class: "btn btn-primary",
                    disabled: selected.read().is_empty(),
                    onclick: start_download,
                    {format!("Download {} selected", selected.read().len())}
                }
            }

            if let Some((job_kind, started)) = job() {
                div {
                    class: "card",
                    h3 { {format!("{} download {}", job_kind.label(), started.job_id)} }
                    if let Some(message) = started.message.clone() {
                        p { class: "muted", "{message}" }
                    }
                    if let Some(status) = job_status() {
                        p { {format!("{:?}: {}% done", status.status, status.percent_done())} }
                        if let Some(item) = status.current_item.clone() {
                            p { class: "muted", "Working on {item}" }
                        }
                        for (index, problem) in status.errors.iter().enumerate() {
                            div { key: "{index}", class: "alert alert-error", "{problem}" }
                        }
                    }
                    button { class: "btn", onclick: check_status, "Check status" }
                }
            }

            div {
                class: "card",
                h3 { "Sync a unit" }
                form {
                    class: "form-row",
                    onsubmit: sync_unit,
                    input {
                        placeholder: "Unit code (e.g. BSBCMM411)",
                        value: sync_code(),
                        oninput: move |evt: FormEvent| sync_code.set(evt.value()),
                    }
                    button { class: "btn", r#type: "submit", "Sync" }
                }
                if let Some(message) = sync_message() {
                    div { class: "alert alert-info", "{message}" }
                }
                Link { class: "btn btn-link", to: Route::Units {}, "Open unit explorer" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::toggle;
    use std::collections::BTreeSet;

    #[test]
    fn test_toggle_selection() {
        let mut selection = BTreeSet::new();
        toggle(&mut selection, "BSB");
        toggle(&mut selection, "ICT");
        assert_eq!(selection.len(), 2);
        toggle(&mut selection, "BSB");
        assert_eq!(selection.into_iter().collect::<Vec<_>>(), vec!["ICT".to_string()]);
    }
}
