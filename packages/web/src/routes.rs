//! Access rules for every page, keyed by the same paths as [`crate::Route`].

use api::{RouteDescriptor, RouteTable};

pub const ROUTES: RouteTable = RouteTable::new(DESCRIPTORS);

const DESCRIPTORS: &[RouteDescriptor] = &[
    RouteDescriptor::public("/", "Home"),
    RouteDescriptor::guest_only("/login", "Login"),
    RouteDescriptor::guest_only("/register", "Register"),
    RouteDescriptor::public("/units", "Units"),
    RouteDescriptor::public("/units/:id", "UnitDetail"),
    RouteDescriptor::authenticated("/profile", "Profile"),
    RouteDescriptor::admin("/admin", "Admin"),
    RouteDescriptor::public("/:..segments", "NotFound"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Route;

    fn name_of(route: Route) -> Option<&'static str> {
        ROUTES.resolve(&route.to_string()).map(|d| d.name)
    }

    #[test]
    fn test_every_page_has_a_descriptor() {
        assert_eq!(name_of(Route::Home {}), Some("Home"));
        assert_eq!(name_of(Route::Login {}), Some("Login"));
        assert_eq!(name_of(Route::Register {}), Some("Register"));
        assert_eq!(name_of(Route::Units {}), Some("Units"));
        assert_eq!(
            name_of(Route::UnitDetail { id: "42".to_string() }),
            Some("UnitDetail")
        );
        assert_eq!(name_of(Route::Profile {}), Some("Profile"));
        assert_eq!(name_of(Route::Admin {}), Some("Admin"));
        assert_eq!(
            name_of(Route::NotFound {
                segments: vec!["no".to_string(), "where".to_string()]
            }),
            Some("NotFound")
        );
    }

    #[test]
    fn test_protected_pages() {
        let admin = ROUTES.by_name("Admin").unwrap();
        assert!(admin.requires_auth && admin.requires_admin);
        assert!(ROUTES.by_name("Profile").unwrap().requires_auth);
        assert!(ROUTES.by_name("Login").unwrap().guest_only);
        assert!(ROUTES.by_name("Register").unwrap().guest_only);
        assert!(!ROUTES.by_name("Units").unwrap().requires_auth);
    }
}
