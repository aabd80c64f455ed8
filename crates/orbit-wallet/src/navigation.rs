//! Screen routing.
//!
//! Paths mirror the Mini App router. Everything except the intro requires
//! onboarding to have completed; unknown paths land on home.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Swaps,
    Quests,
    Intro,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Swaps => "/swaps",
            Route::Quests => "/quests",
            Route::Intro => "/intro",
        }
    }

    /// Match a path; anything unrecognised is home.
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim();
        let trimmed = trimmed.strip_suffix('/').filter(|p| !p.is_empty()).unwrap_or(trimmed);
        match trimmed {
            "/swaps" => Route::Swaps,
            "/quests" => Route::Quests,
            "/intro" => Route::Intro,
            _ => Route::Home,
        }
    }

    pub fn requires_onboarding(&self) -> bool {
        !matches!(self, Route::Intro)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Where `path` actually leads given the onboarding state.
pub fn resolve(path: &str, has_visited: bool) -> Route {
    let route = Route::from_path(path);
    if route.requires_onboarding() && !has_visited {
        Route::Intro
    } else {
        route
    }
}

/// Bottom menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Home,
    Swaps,
    Quests,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Home, Tab::Swaps, Tab::Quests];

    pub fn route(&self) -> Route {
        match self {
            Tab::Home => Route::Home,
            Tab::Swaps => Route::Swaps,
            Tab::Quests => Route::Quests,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Home => "Home",
            Tab::Swaps => "Swaps",
            Tab::Quests => "Quests",
        }
    }

    /// The tab highlighted for `route`, if any.
    pub fn for_route(route: Route) -> Option<Tab> {
        Tab::ALL.into_iter().find(|t| t.route() == route)
    }
}
