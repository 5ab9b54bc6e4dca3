//! This module handles the responses the route handlers can produce.
//!
//! Every page handler resolves to one of two shapes: a rendered template, or
//! a redirect carrying a flash message. `AppResponse` unifies the two so a
//! single handler can return either, with `Result<AppResponse, Status>`
//! covering the hard-failure path (caught and rendered by the catchers).

use rocket::response::{Flash, Redirect};
use rocket_dyn_templates::Template;

/// A successful response from a page handler.
#[derive(Responder)]
pub enum AppResponse {
    /// A rendered HTML page.
    Page(Template),
    /// A 303 redirect with a flash message for the next page to display.
    Redirect(Flash<Redirect>),
}

impl From<Template> for AppResponse {
    fn from(t: Template) -> Self {
        AppResponse::Page(t)
    }
}

impl From<Flash<Redirect>> for AppResponse {
    fn from(f: Flash<Redirect>) -> Self {
        AppResponse::Redirect(f)
    }
}
