//! Landing page: introductory quests anyone can play, with guest progress.

use api::{GuestProgress, Quest};
use dioxus::prelude::*;
use serde_json::json;
use ui::{use_guest_bridge, use_session, use_session_store};

use crate::Route;

#[component]
pub fn Home() -> Element {
    let state = use_session();
    let store = use_session_store();
    let guest = use_guest_bridge();
    let mut quests = use_signal(Vec::<Quest>::new);
    let mut progress = use_signal(|| Option::<GuestProgress>::None);
    let mut error = use_signal(|| Option::<String>::None);
    let mut refresh = use_signal(|| 0u32);

    let _quests = use_resource(move || {
        let store = store.clone();
        async move {
            match store.api().introductory_quests().await {
                Ok(list) => quests.set(list),
                Err(e) => {
                    tracing::error!("Failed to load quests: {}", e);
                    error.set(Some("Could not load quests. Please try again.".to_string()));
                }
            }
        }
    });

    let loader_guest = guest.clone();
    let _progress = use_resource(move || {
        let guest = loader_guest.clone();
        let _ = refresh();
        async move {
            match guest.load_progress().await {
                Ok(found) => progress.set(found),
                Err(e) => tracing::warn!("Failed to load guest progress: {}", e),
            }
        }
    });

    let start_quest = move |quest_id: String| {
        let guest = guest.clone();
        spawn(async move {
            match guest
                .save_progress(&quest_id, json!({ "started": true, "completed_steps": 0 }))
                .await
            {
                Ok(_) => refresh += 1,
                Err(e) => {
                    tracing::error!("Failed to save guest progress: {}", e);
                    error.set(Some("Could not save your progress. Please try again.".to_string()));
                }
            }
        });
    };

    let signed_in = state().session.is_authenticated();

    rsx! {
        section {
            class: "hero",
            h1 { "Learn by doing" }
            p { "Nationally recognised units of competency, one quest at a time." }
            Link { class: "btn btn-primary", to: Route::Units {}, "Explore units" }
        }

        if let Some(err) = error() {
            div { class: "alert alert-error", "{err}" }
        }

        if !signed_in {
            if let Some(saved) = progress() {
                div {
                    class: "alert alert-info",
                    {format!("You have unsaved progress on quest {}. ", saved.quest_id)}
                    Link { to: Route::Register {}, "Create an account" }
                    " to keep it."
                }
            }
        }

        section {
            class: "quests",
            h2 { "Introductory quests" }
            div {
                class: "card-grid",
                for quest in quests() {
                    div {
                        key: "{quest.id}",
                        class: "card",
                        h3 { {quest.title.clone()} }
                        if let Some(description) = &quest.description {
                            p { class: "muted", {description.clone()} }
                        }
                        p { class: "xp", {format!("{} XP", quest.experience_points)} }
                        if !signed_in {
                            button {
                                class: "btn",
                                onclick: {
                                    let id = quest.id.clone();
                                    let start_quest = start_quest.clone();
                                    move |_| start_quest(id.clone())
                                },
                                "Start as guest"
                            }
                        }
                    }
                }
            }
        }
    }
}
