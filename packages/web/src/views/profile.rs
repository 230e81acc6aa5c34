use dioxus::prelude::*;
use ui::{use_session, LogoutButton};

#[component]
pub fn Profile() -> Element {
    let state = use_session();
    let session = state().session;

    let Some(user) = session.user() else {
        return rsx! {};
    };
    let level = user
        .level
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "-".to_string());
    let role = user.role().unwrap_or("learner").to_string();

    rsx! {
        section {
            class: "profile",
            h1 { {user.display_name()} }
            p { class: "muted", {user.email.clone()} }

            div {
                class: "stat-grid",
                div {
                    class: "stat",
                    span { class: "stat-value", {user.experience_points.to_string()} }
                    span { class: "stat-label", "Experience points" }
                }
                div {
                    class: "stat",
                    span { class: "stat-value", "{level}" }
                    span { class: "stat-label", "Level" }
                }
                div {
                    class: "stat",
                    span { class: "stat-value", "{role}" }
                    span { class: "stat-label", "Role" }
                }
            }

            LogoutButton { class: "btn" }
        }
    }
}
