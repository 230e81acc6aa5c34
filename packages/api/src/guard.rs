//! # Route authorization
//!
//! [`authorize`] decides whether a navigation may proceed, as a pure
//! function of the destination's [`RouteDescriptor`] and a [`Session`]
//! snapshot. Rules, first match wins:
//!
//! | # | Condition | Outcome |
//! |---|-----------|---------|
//! | 1 | `requires_auth` and not authenticated | [`Navigation::RedirectToLogin`] |
//! | 2 | `requires_auth && requires_admin` and role is not `admin` | [`Navigation::RedirectToHome`] |
//! | 3 | `guest_only` and authenticated | [`Navigation::RedirectToHome`] |
//! | 4 | otherwise | [`Navigation::Allow`] |
//!
//! Admin access comes only from the role on the fetched user record.
//!
//! [`RouteTable`] maps concrete paths onto descriptors so the UI can
//! authorize whatever its router resolved.

use crate::session::Session;

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";

/// Static access rules for one route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDescriptor {
    /// Pattern: literal segments, `:name` parameters, and a trailing `*` or
    /// `:..name` catch-all.
    pub path: &'static str,
    pub name: &'static str,
    pub requires_auth: bool,
    pub requires_admin: bool,
    pub guest_only: bool,
}

impl RouteDescriptor {
    pub const fn public(path: &'static str, name: &'static str) -> Self {
        Self {
            path,
            name,
            requires_auth: false,
            requires_admin: false,
            guest_only: false,
        }
    }

    /// Login, registration: pointless once signed in.
    pub const fn guest_only(path: &'static str, name: &'static str) -> Self {
        Self {
            guest_only: true,
            ..Self::public(path, name)
        }
    }

    pub const fn authenticated(path: &'static str, name: &'static str) -> Self {
        Self {
            requires_auth: true,
            ..Self::public(path, name)
        }
    }

    pub const fn admin(path: &'static str, name: &'static str) -> Self {
        Self {
            requires_auth: true,
            requires_admin: true,
            ..Self::public(path, name)
        }
    }

    /// Whether `path` (no query or fragment) matches this descriptor.
    pub fn matches(&self, path: &str) -> bool {
        let mut pattern = segments(self.path);
        let mut actual = segments(path);
        loop {
            match (pattern.next(), actual.next()) {
                (None, None) => return true,
                (Some(p), _) if p == "*" || p.starts_with(":..") => return true,
                (Some(p), Some(_)) if p.starts_with(':') => {}
                (Some(p), Some(a)) if p == a => {}
                _ => return false,
            }
        }
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Outcome of a navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Allow,
    RedirectToLogin,
    RedirectToHome,
}

impl Navigation {
    /// Where to go instead, if anywhere.
    pub fn redirect_path(self) -> Option<&'static str> {
        match self {
            Navigation::Allow => None,
            Navigation::RedirectToLogin => Some(LOGIN_PATH),
            Navigation::RedirectToHome => Some(HOME_PATH),
        }
    }
}

pub fn authorize(route: &RouteDescriptor, session: &Session) -> Navigation {
    let authenticated = session.is_authenticated();
    if route.requires_auth && !authenticated {
        Navigation::RedirectToLogin
    } else if route.requires_auth && route.requires_admin && !session.has_role("admin") {
        Navigation::RedirectToHome
    } else if route.guest_only && authenticated {
        Navigation::RedirectToHome
    } else {
        Navigation::Allow
    }
}

/// Descriptor table, searched in declaration order.
#[derive(Debug, Clone, Copy)]
pub struct RouteTable {
    routes: &'static [RouteDescriptor],
}

impl RouteTable {
    pub const fn new(routes: &'static [RouteDescriptor]) -> Self {
        Self { routes }
    }

    pub fn routes(&self) -> &'static [RouteDescriptor] {
        self.routes
    }

    /// First descriptor matching `path`. Query string and fragment are ignored.
    pub fn resolve(&self, path: &str) -> Option<&'static RouteDescriptor> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        self.routes.iter().find(|route| route.matches(path))
    }

    pub fn by_name(&self, name: &str) -> Option<&'static RouteDescriptor> {
        self.routes.iter().find(|route| route.name == name)
    }

    /// Authorize a concrete path. Unknown paths are allowed through to
    /// whatever not-found handling the UI has.
    pub fn authorize_path(&self, path: &str, session: &Session) -> Navigation {
        match self.resolve(path) {
            Some(route) => authorize(route, session),
            None => Navigation::Allow,
        }
    }
}
