use dioxus::prelude::*;

use crate::auth::{use_session, LogoutButton};

#[component]
pub fn Navbar(children: Element) -> Element {
    let state = use_session();
    let session = state().session;

    rsx! {
        nav {
            class: "navbar",
            Link { class: "navbar-brand", to: "/", "LearnOnline" }
            Link { to: "/units", "Units" }
            {children}
            div {
                class: "navbar-account",
                if let Some(user) = session.user() {
                    if session.is_admin() {
                        Link { to: "/admin", "Admin" }
                    }
                    Link {
                        to: "/profile",
                        span { class: "navbar-user", {user.display_name()} }
                    }
                    span {
                        class: "navbar-xp",
                        {format!("{} XP", user.experience_points)}
                        if let Some(level) = &user.level {
                            {format!(" · Level {level}")}
                        }
                    }
                    LogoutButton { class: "navbar-logout" }
                } else if !state().loading {
                    Link { to: "/login", "Log in" }
                    Link { to: "/register", "Sign up" }
                }
            }
        }
    }
}
