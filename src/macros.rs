//! This module contains ease-of-use macros for the app.
//!
//! Each aims to simplify code throughout the project - usually in `main.rs`.

/// A macro to shorthand bailing out of a function due to a database or
/// hashing error. Logs the error and returns a 500 to be rendered by the
/// internal error catcher. Note that a string must be provided (or used like
/// `format!()`).
///
/// **Example**
/// ```rust,ignore
///     match r {
///         Ok(rows) => Ok(rows),
///         Err(e) => failure!("Failed to load rows due to error {}", e),
///     }
/// ```
macro_rules! failure {
    () => {
        compile_error!("String must be provided to failure macro!");
    };
    ($($arg:tt)*) => {
        {
            log::error!($($arg)*);
            return Err(rocket::http::Status::InternalServerError);
        }
    };
}

/// A macro to shorthand the rejection from a form handler. Flashes the
/// provided message and redirects the browser to the given route. The
/// message is user-visible, keep it readable.
///
/// **Example**
/// ```rust,ignore
///     #[post("/register", data = "<form>")]
///     async fn register_process(form: Form<RegisterForm>) -> Result<Flash<Redirect>, Status> {
///         if form.password.is_empty() {
///             reject!(uri!(register_form), "A password is required.");
///         }
///         //...
///     }
/// ```
macro_rules! reject {
    ($uri:expr) => {
        compile_error!("A message must be provided to the reject macro!");
    };
    ($uri:expr, $($arg:tt)*) => {
        {
            return Ok(rocket::response::Flash::error(
                rocket::response::Redirect::to($uri),
                format!($($arg)*),
            )
            .into());
        }
    };
}

pub(crate) use {failure, reject};
