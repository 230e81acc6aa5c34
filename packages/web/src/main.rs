use dioxus::prelude::*;

use ui::{use_session, Navbar, SessionProvider, SessionState};
use views::{Admin, Home, Login, NotFound, Profile, Register, UnitDetail, Units};

mod routes;
mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(Shell)]
        #[route("/")]
        Home {},
        #[route("/login")]
        Login {},
        #[route("/register")]
        Register {},
        #[route("/units")]
        Units {},
        #[route("/units/:id")]
        UnitDetail { id: String },
        #[route("/profile")]
        Profile {},
        #[route("/admin")]
        Admin {},
        #[route("/:..segments")]
        NotFound { segments: Vec<String> },
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        SessionProvider {
            Router::<Route> {}
        }
    }
}

/// What the shell renders for the current path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShellView {
    Page,
    /// The stored session is still being checked; don't bounce yet.
    Loading,
    Redirect(&'static str),
}

fn shell_view(path: &str, state: &SessionState) -> ShellView {
    match routes::ROUTES
        .authorize_path(path, &state.session)
        .redirect_path()
    {
        None => ShellView::Page,
        Some(_) if state.loading => ShellView::Loading,
        Some(target) => ShellView::Redirect(target),
    }
}

/// Page chrome plus the route guard. Every navigation is checked against
/// [`routes::ROUTES`] before the page renders.
#[component]
fn Shell() -> Element {
    let route = use_route::<Route>();
    let state = use_session();
    let nav = use_navigator();

    let path = route.to_string();
    let body = match shell_view(&path, &state()) {
        ShellView::Page => rsx! { Outlet::<Route> {} },
        ShellView::Loading => rsx! {
            div { class: "page-loading", "Loading..." }
        },
        ShellView::Redirect(target) => {
            tracing::info!("{} is not available here, redirecting to {}", path, target);
            nav.replace(target);
            rsx! {}
        }
    };

    rsx! {
        Navbar {}
        main {
            class: "page",
            {body}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::{Session, SessionStore};
    use store::MemoryStore;
    use views::testing::Backend;

    async fn signed_in(email: &str) -> Session {
        let store = SessionStore::new(Backend, MemoryStore::new());
        store.login(email, "pw").await.unwrap();
        store.snapshot()
    }

    fn state(session: Session, loading: bool) -> SessionState {
        SessionState { session, loading }
    }

    fn admin_path() -> String {
        Route::Admin {}.to_string()
    }

    #[test]
    fn test_loading_shows_placeholder_instead_of_redirect() {
        let checking = state(Session::default(), true);
        assert_eq!(shell_view(&admin_path(), &checking), ShellView::Loading);
        assert_eq!(shell_view(&Route::Profile {}.to_string(), &checking), ShellView::Loading);
        // Public pages render while the check is in flight.
        assert_eq!(shell_view(&Route::Units {}.to_string(), &checking), ShellView::Page);

        let anonymous = state(Session::default(), false);
        assert_eq!(shell_view(&admin_path(), &anonymous), ShellView::Redirect("/login"));
    }

    #[tokio::test]
    async fn test_non_admin_never_renders_admin_page() {
        let member = signed_in("member@example.com").await;
        assert!(!member.is_admin());

        for loading in [false, true] {
            assert_ne!(shell_view(&admin_path(), &state(member.clone(), loading)), ShellView::Page);
        }
        assert_eq!(
            shell_view(&admin_path(), &state(member.clone(), false)),
            ShellView::Redirect("/")
        );
        assert_eq!(
            shell_view(&Route::Profile {}.to_string(), &state(member, false)),
            ShellView::Page
        );
    }

    #[tokio::test]
    async fn test_admin_renders_admin_page() {
        let admin = signed_in("admin@example.com").await;
        assert!(admin.is_admin());
        assert_eq!(shell_view(&admin_path(), &state(admin.clone(), false)), ShellView::Page);
        assert_eq!(
            shell_view(&Route::Login {}.to_string(), &state(admin, false)),
            ShellView::Redirect("/")
        );
    }
}
