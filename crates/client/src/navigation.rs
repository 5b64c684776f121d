// View navigation
//
// The session store only ever sends the user to two places. What a
// navigation means (switching a view, printing a hint) is up to the host.

use std::cell::RefCell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
        }
    }
}

pub trait Navigator {
    fn navigate(&self, route: Route);
}

/// Navigator that records every route it is sent to.
#[derive(Debug, Default)]
pub struct History {
    visited: RefCell<Vec<Route>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Route> {
        self.visited.borrow().last().copied()
    }

    pub fn visited(&self) -> Vec<Route> {
        self.visited.borrow().clone()
    }
}

impl Navigator for History {
    fn navigate(&self, route: Route) {
        log::debug!("Navigate to {}", route.path());
        self.visited.borrow_mut().push(route);
    }
}
