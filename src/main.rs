#![doc = include_str!("../readme.md")]

#[cfg(test)]
#[doc(hidden)]
mod tests;

#[doc(hidden)]
#[rustfmt::skip]
mod schema;

mod common;
mod config;
mod macros;
mod models;
mod response;

#[macro_use]
extern crate rocket;

#[macro_use]
extern crate diesel;

use macros::reject;
use models::{LoginForm, NewRating, NewUser, RatingForm, RegisterForm, SessionUser};
use response::AppResponse;
use rocket::fairing::AdHoc;
use rocket::form::Form;
use rocket::http::{Cookie, CookieJar, Status};
use rocket::request::FlashMessage;
use rocket::response::{Flash, Redirect};
use rocket_dyn_templates::{context, Template};

/// Database connection
#[rocket_sync_db_pools::database("sqlite_database")]
pub struct DbConn(diesel::SqliteConnection);

/// Flatten an incoming flash message into something a template can print.
fn flash_text(flash: Option<FlashMessage<'_>>) -> Option<String> {
    flash.map(|f| f.message().to_string())
}

/// Homepage.
#[get("/")]
fn index(flash: Option<FlashMessage<'_>>) -> Template {
    Template::render(
        "homepage",
        context! {
            app_name: config::APP_NAME.clone(),
            flash: flash_text(flash),
        },
    )
}

/// Show the list of all registered users.
#[get("/users")]
async fn user_list(conn: DbConn, flash: Option<FlashMessage<'_>>) -> Result<Template, Status> {
    let users = common::load_all_users(&conn).await?;
    Ok(Template::render(
        "user_list",
        context! { users, flash: flash_text(flash) },
    ))
}

/// Show an individual user with their ratings joined onto movie titles.
/// An unknown id renders the not-found page.
#[get("/users/<id>")]
async fn user_detail(
    conn: DbConn,
    id: i32,
    flash: Option<FlashMessage<'_>>,
) -> Result<Template, Status> {
    let user = match common::find_user_profile(&conn, id).await? {
        Some(u) => u,
        None => return Err(Status::NotFound),
    };
    let user_movie_ratings = common::load_user_ratings(&conn, id).await?;

    Ok(Template::render(
        "user",
        context! { user, user_movie_ratings, flash: flash_text(flash) },
    ))
}

/// Show the list of movies, sorted by title.
#[get("/movies")]
async fn movie_list(conn: DbConn, flash: Option<FlashMessage<'_>>) -> Result<Template, Status> {
    let movies = common::load_all_movies(&conn).await?;
    Ok(Template::render(
        "movie_list",
        context! { movies, flash: flash_text(flash) },
    ))
}

/// Show an individual movie with its ratings joined onto rater emails.
#[get("/movies/<id>")]
async fn movie_detail(
    conn: DbConn,
    id: i32,
    flash: Option<FlashMessage<'_>>,
) -> Result<Template, Status> {
    let movie = match common::find_movie(&conn, id).await? {
        Some(m) => m,
        None => return Err(Status::NotFound),
    };
    let movie_ratings = common::load_movie_ratings(&conn, id).await?;

    Ok(Template::render(
        "movie",
        context! { movie, movie_ratings, flash: flash_text(flash) },
    ))
}

/// Add or update the logged-in user's rating for a movie. One atomic upsert,
/// so a second submission overwrites the score rather than adding a row.
/// Posting without a session is an authorization error, not a crash.
#[post("/movies/<id>", data = "<form>")]
async fn rate_movie(
    conn: DbConn,
    id: i32,
    user: Option<SessionUser>,
    form: Form<RatingForm>,
) -> Result<Flash<Redirect>, Status> {
    let user = match user {
        Some(u) => u,
        None => reject!(uri!(login_form), "Please log in to rate movies."),
    };

    if common::find_movie(&conn, id).await?.is_none() {
        return Err(Status::NotFound);
    }

    let score = form.into_inner().score;
    if !(1..=5).contains(&score) {
        reject!(uri!(movie_detail(id)), "Scores must be between 1 and 5.");
    }

    common::upsert_rating(
        &conn,
        NewRating {
            user_id: user.0,
            movie_id: id,
            score,
        },
    )
    .await?;

    Ok(Flash::success(
        Redirect::to(uri!(movie_list)),
        "Your rating was recorded.",
    ))
}

/// Show the registration form.
#[get("/register")]
fn register_form(flash: Option<FlashMessage<'_>>) -> Template {
    Template::render("register_form", context! { flash: flash_text(flash) })
}

/// Process a registration. A duplicate email never creates a second row, it
/// redirects to the login page instead.
#[post("/register", data = "<form>")]
async fn register_process(
    conn: DbConn,
    form: Form<RegisterForm>,
) -> Result<Flash<Redirect>, Status> {
    let form = form.into_inner();

    //Validate password requirements, for now all we check is length
    if form.password.len() < *config::MIN_PASSWORD_LENGTH {
        reject!(uri!(register_form), "Password too short.");
    }
    if form.password.len() > *config::MAX_PASSWORD_LENGTH {
        reject!(uri!(register_form), "Password too long.");
    }

    //Validate the email isn't taken
    if common::find_user_by_email(&conn, form.email.clone())
        .await?
        .is_some()
    {
        reject!(uri!(login_form), "Account already exists. Please login.");
    }

    let new_user = NewUser {
        email: form.email,
        password: common::hash_string_with_salt(&form.password)?,
        age: form.age,
        zipcode: form.zipcode,
    };
    common::create_user(&conn, new_user).await?;

    Ok(Flash::success(
        Redirect::to(uri!(login_form)),
        "User account created. Please login.",
    ))
}

/// Show the login form, or bounce an already-authenticated browser to their
/// own user page.
#[get("/login")]
fn login_form(user: Option<SessionUser>, flash: Option<FlashMessage<'_>>) -> AppResponse {
    match user {
        Some(SessionUser(id)) => AppResponse::Redirect(Flash::success(
            Redirect::to(uri!(user_detail(id))),
            "Already logged in.",
        )),
        None => AppResponse::Page(Template::render(
            "login_form",
            context! { flash: flash_text(flash) },
        )),
    }
}

/// Process a login. On a hash match the user's id is stored in the signed
/// session cookie; anything else leaves the session untouched.
#[post("/login", data = "<form>")]
async fn login_process(
    conn: DbConn,
    cookies: &CookieJar<'_>,
    form: Form<LoginForm>,
) -> Result<Flash<Redirect>, Status> {
    let form = form.into_inner();

    let user = match common::find_user_by_email(&conn, form.email).await? {
        Some(u) => u,
        None => reject!(uri!(login_form), "Login Failed"),
    };

    if !common::compare_hashed_strings(&form.password, &user.password)? {
        reject!(uri!(login_form), "Login Failed");
    }

    cookies.add_private(Cookie::new(config::SESSION_COOKIE, user.id.to_string()));
    Ok(Flash::success(
        Redirect::to(uri!(user_detail(user.id))),
        "Logged In",
    ))
}

/// Clear the session. Safe to call when not logged in.
#[get("/logout")]
fn logout(cookies: &CookieJar<'_>) -> Flash<Redirect> {
    cookies.remove_private(Cookie::from(config::SESSION_COOKIE));
    Flash::success(Redirect::to(uri!(index)), "Logged out.")
}

#[catch(404)]
fn not_found(req: &rocket::Request<'_>) -> Template {
    Template::render("not_found", context! { uri: req.uri().to_string() })
}

#[catch(500)]
fn internal_error() -> Template {
    Template::render("internal_error", context! {})
}

#[doc(hidden)]
#[launch]
pub fn rocket() -> _ {
    config::initialize_globals();

    let figment = rocket::Config::figment()
        .merge(("secret_key", config::SECRET_KEY.as_str()))
        .merge(("databases.sqlite_database.url", config::DATABASE_URL.as_str()))
        .merge(("databases.sqlite_database.pool_size", 1));

    rocket::custom(figment)
        .mount(
            "/",
            routes![
                index,
                user_list,
                user_detail,
                movie_list,
                movie_detail,
                rate_movie,
                register_form,
                register_process,
                login_form,
                login_process,
                logout,
            ],
        )
        .register("/", catchers![not_found, internal_error])
        .attach(Template::fairing())
        .attach(DbConn::fairing())
        .attach(AdHoc::on_ignite("Database Setup", |rocket| async {
            let conn = DbConn::get_one(&rocket)
                .await
                .expect("a database connection");
            common::initialize_database(&conn)
                .await
                .expect("the database schema to initialize");
            rocket
        }))
}
