//! Various objects, including database objects, for the app.
use chrono::NaiveDateTime;
use diesel::prelude::*;
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome, Request};
use serde::Serialize;

use crate::schema::{movies, ratings, users};

/// A registered account, as stored in the users table. The password field
/// holds an argon2id hash string, never the raw password.
#[derive(Queryable)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub password: String,
    pub age: Option<i32>,
    pub zipcode: Option<String>,
    pub created_at: NaiveDateTime,
}

/// An account to be inserted into the users table. `created_at` is left to
/// the database default.
#[derive(Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub age: Option<i32>,
    pub zipcode: Option<String>,
}

/// A movie row. Movies are seeded from config and have no write routes.
#[derive(Queryable, Serialize)]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub released: Option<String>,
    pub imdb_url: Option<String>,
}

/// A movie to be inserted into the movies table when seeding a fresh
/// database from `config/movies.toml`.
#[derive(Insertable, Clone)]
#[diesel(table_name = movies)]
pub struct NewMovie {
    pub title: String,
    pub released: Option<String>,
    pub imdb_url: Option<String>,
}

/// A rating to be inserted (or upserted) into the ratings table.
#[derive(Insertable)]
#[diesel(table_name = ratings)]
pub struct NewRating {
    pub user_id: i32,
    pub movie_id: i32,
    pub score: i32,
}

/// The subset of a user that pages are allowed to see. Password hashes never
/// reach a template context.
#[derive(Queryable, Serialize)]
pub struct UserProfile {
    pub id: i32,
    pub email: String,
    pub age: Option<i32>,
    pub zipcode: Option<String>,
}

/// One row of the ratings list on a user page: the movie title joined onto
/// the user's score.
#[derive(Queryable, Serialize)]
pub struct UserMovieRating {
    pub title: String,
    pub score: i32,
}

/// One row of the ratings list on a movie page: the rater's email joined
/// onto their score.
#[derive(Queryable, Serialize)]
pub struct MovieRating {
    pub email: String,
    pub score: i32,
}

/// The registration form body. Age and zipcode are optional.
#[derive(FromForm)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub age: Option<i32>,
    pub zipcode: Option<String>,
}

/// The login form body.
#[derive(FromForm)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// The rating form body posted from a movie page.
#[derive(FromForm)]
pub struct RatingForm {
    pub score: i32,
}

/// The logged-in user's id, pulled from the signed `userid` session cookie.
/// Request with no (or an unreadable) cookie forwards, so handlers take
/// `Option<SessionUser>` and decide how to reject.
pub struct SessionUser(pub i32);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for SessionUser {
    type Error = std::convert::Infallible;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let id = req
            .cookies()
            .get_private(crate::config::SESSION_COOKIE)
            .and_then(|c| c.value().parse::<i32>().ok());

        match id {
            Some(id) => Outcome::Success(SessionUser(id)),
            None => Outcome::Forward(Status::Unauthorized),
        }
    }
}
