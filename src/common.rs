use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use rocket::http::Status;

use crate::config;
use crate::macros::failure;
use crate::models::{Movie, MovieRating, NewRating, NewUser, User, UserMovieRating, UserProfile};
use crate::DbConn;

/// Hash a string with a random salt to be stored in the database.
/// Utilizes the argon2id algorithm.
/// Followed best practices as laid out here: https://cheatsheetseries.owasp.org/cheatsheets/Password_Storage_Cheat_Sheet.html
pub fn hash_string_with_salt(s: &str) -> Result<String, Status> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    match argon2.hash_password(s.as_bytes(), &salt) {
        Ok(hash) => Ok(hash.to_string()),
        Err(e) => failure!("Failed to create hash {}", e),
    }
}

/// A function which checks whether the first string can be hashed into the second string.
/// Returns a boolean true if they are the same, and false otherwise.
pub fn compare_hashed_strings(original: &str, hashed: &str) -> Result<bool, Status> {
    let argon2 = Argon2::default();
    let parsed_hash = match PasswordHash::new(hashed) {
        Ok(h) => h,
        Err(e) => failure!("Failed to compare hashes {}", e),
    };
    Ok(argon2
        .verify_password(original.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Attempt to find a user by email, returns None if no account exists.
/// Emails are unique, so at most one row can match.
pub async fn find_user_by_email(conn: &DbConn, user_email: String) -> Result<Option<User>, Status> {
    use crate::schema::users::dsl::*;
    let r = conn
        .run(move |c| {
            users
                .filter(email.eq(user_email))
                .first::<User>(c)
                .optional()
        })
        .await;

    match r {
        Ok(u) => Ok(u),
        Err(e) => failure!("Failed to find user due to error {}", e),
    }
}

/// Load the public profile of a single user. Absence is a handled case, the
/// caller decides whether it becomes a 404.
pub async fn find_user_profile(conn: &DbConn, user_id: i32) -> Result<Option<UserProfile>, Status> {
    use crate::schema::users::dsl::*;
    let r = conn
        .run(move |c| {
            users
                .filter(id.eq(user_id))
                .select((id, email, age, zipcode))
                .first::<UserProfile>(c)
                .optional()
        })
        .await;

    match r {
        Ok(u) => Ok(u),
        Err(e) => failure!("Failed to find user due to error {}", e),
    }
}

/// Load every registered user for the user list page.
pub async fn load_all_users(conn: &DbConn) -> Result<Vec<UserProfile>, Status> {
    use crate::schema::users::dsl::*;
    let r = conn
        .run(|c| {
            users
                .select((id, email, age, zipcode))
                .order(id.asc())
                .load::<UserProfile>(c)
        })
        .await;

    match r {
        Ok(u) => Ok(u),
        Err(e) => failure!("Failed to load users due to error {}", e),
    }
}

/// Load one user's ratings joined with the titles of the rated movies.
pub async fn load_user_ratings(
    conn: &DbConn,
    for_user: i32,
) -> Result<Vec<UserMovieRating>, Status> {
    use crate::schema::{movies, ratings};
    let r = conn
        .run(move |c| {
            ratings::table
                .inner_join(movies::table)
                .filter(ratings::user_id.eq(for_user))
                .select((movies::title, ratings::score))
                .order(movies::title.asc())
                .load::<UserMovieRating>(c)
        })
        .await;

    match r {
        Ok(f) => Ok(f),
        Err(e) => failure!("Unable to collect user ratings due to error {}", e),
    }
}

/// Load a single movie by id. Absence is a handled case.
pub async fn find_movie(conn: &DbConn, movie_id: i32) -> Result<Option<Movie>, Status> {
    use crate::schema::movies::dsl::*;
    let r = conn
        .run(move |c| movies.filter(id.eq(movie_id)).first::<Movie>(c).optional())
        .await;

    match r {
        Ok(m) => Ok(m),
        Err(e) => failure!("Failed to find movie due to error {}", e),
    }
}

/// Load every movie, sorted by title for the movie list page.
pub async fn load_all_movies(conn: &DbConn) -> Result<Vec<Movie>, Status> {
    use crate::schema::movies::dsl::*;
    let r = conn
        .run(|c| movies.order(title.asc()).load::<Movie>(c))
        .await;

    match r {
        Ok(m) => Ok(m),
        Err(e) => failure!("Failed to load movies due to error {}", e),
    }
}

/// Load every rating for a movie joined with the rater's email.
pub async fn load_movie_ratings(
    conn: &DbConn,
    for_movie: i32,
) -> Result<Vec<MovieRating>, Status> {
    use crate::schema::{ratings, users};
    let r = conn
        .run(move |c| {
            ratings::table
                .inner_join(users::table)
                .filter(ratings::movie_id.eq(for_movie))
                .select((users::email, ratings::score))
                .order(users::email.asc())
                .load::<MovieRating>(c)
        })
        .await;

    match r {
        Ok(f) => Ok(f),
        Err(e) => failure!("Unable to collect movie ratings due to error {}", e),
    }
}

/// Save a new account in the database. The caller is responsible for hashing
/// the password and for checking the email is not already taken.
pub async fn create_user(conn: &DbConn, new_user: NewUser) -> Result<(), Status> {
    use crate::schema::users;
    let r = conn
        .run(move |c| {
            diesel::insert_into(users::table)
                .values(&new_user)
                .execute(c)
        })
        .await;

    match r {
        Ok(_) => Ok(()),
        Err(e) => failure!("Failed to insert user due to error {}", e),
    }
}

/// Insert a rating, or overwrite the score of the existing one. A single
/// atomic statement, the unique (user_id, movie_id) index does the work.
pub async fn upsert_rating(conn: &DbConn, new_rating: NewRating) -> Result<(), Status> {
    use crate::schema::ratings;
    let r = conn
        .run(move |c| {
            let new_score = new_rating.score;
            diesel::insert_into(ratings::table)
                .values(&new_rating)
                .on_conflict((ratings::user_id, ratings::movie_id))
                .do_update()
                .set(ratings::score.eq(new_score))
                .execute(c)
        })
        .await;

    match r {
        Ok(_) => Ok(()),
        Err(e) => failure!("Failed to record rating due to error {}", e),
    }
}

/// Create the schema if it does not exist yet, and seed the movie table from
/// config on first run. Runs once at ignition.
pub async fn initialize_database(conn: &DbConn) -> Result<(), diesel::result::Error> {
    use crate::schema::movies;
    conn.run(|c| {
        c.batch_execute(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;
             PRAGMA foreign_keys = ON;

             CREATE TABLE IF NOT EXISTS users (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 email TEXT NOT NULL UNIQUE,
                 password TEXT NOT NULL,
                 age INTEGER,
                 zipcode TEXT,
                 created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
             );

             CREATE TABLE IF NOT EXISTS movies (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 title TEXT NOT NULL,
                 released TEXT,
                 imdb_url TEXT
             );

             CREATE TABLE IF NOT EXISTS ratings (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 user_id INTEGER NOT NULL REFERENCES users(id),
                 movie_id INTEGER NOT NULL REFERENCES movies(id),
                 score INTEGER NOT NULL,
                 UNIQUE (user_id, movie_id)
             );",
        )?;

        // Exclusive transaction so two igniting instances cannot both seed.
        c.exclusive_transaction(|c| {
            let seeded: i64 = movies::table.count().get_result(c)?;
            if seeded == 0 {
                diesel::insert_into(movies::table)
                    .values(&*config::SEED_MOVIES)
                    .execute(c)?;
            }
            Ok(())
        })
    })
    .await
}
