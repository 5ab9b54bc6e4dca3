//! Configuration module for the app. This handles the loading and parsing of
//! configuration options, falling back from the environment to the toml
//! files under `./config/`.

use lazy_static::lazy_static;

use crate::models::NewMovie;

/// The location of all config files on the system.
const CONFIG_LOCATION: &str = "./config/";

/// The name of the session cookie holding the logged-in user's id.
pub const SESSION_COOKIE: &str = "userid";

/// The different config paths we can load from
enum PathType {
    General,
    Movies,
}

impl PathType {
    fn get_path(&self) -> String {
        let name = match *self {
            PathType::General => "general",
            PathType::Movies => "movies",
        };

        let testing_file = format!("{}/{}-test.toml", CONFIG_LOCATION, name);
        if std::path::Path::new(&testing_file).exists() {
            testing_file
        } else {
            format!("{}/{}.toml", CONFIG_LOCATION, name)
        }
    }
}

/// Opens the general config file, and attempts to load the toml::Value
/// specified in the provided &str.
fn load_from_toml(name: &str) -> Result<toml::Value, String> {
    let file_path = PathType::General.get_path();
    let data = std::fs::read_to_string(file_path).map_err(|e| e.to_string())?;
    let f = data.parse::<toml::Value>().map_err(|e| e.to_string())?;

    match f.get(name) {
        Some(k) => Ok(k.to_owned()),
        None => Err(String::from("Key not found in ./config/general.toml")),
    }
}

/// A macro to load configuration from the environment.
///
/// Attempts to load from multiple sources falling back in this order:
/// 1. Load from environment
/// 2. Load from `./config/general.toml`
/// 3. panic!
///
/// This macro is intended for use with lazy static, as these values like to
/// be loaded/parsed at runtime, not at compile-time.
macro_rules! load_env {
    () => {
        compile_error!("String must be provided to load_env macro!");
    };
    ($arg:tt) => {
        {
            use std::env::var;
            use crate::config::load_from_toml;
            let env_name: &str = $arg;

            //1. Attempt to load from env
            if let Ok(d) = var(env_name) {
                return d.parse().expect("a parsed value")
            }
            if let Ok(d) = var(env_name.to_uppercase()) {
                return d.parse().expect("a parsed value")
            }

            //2. Attempt to load from /config/general.toml
            if let Ok(d) = load_from_toml(env_name) {
                if let Ok(v) = d.try_into() {
                    return v;
                }
            }
            if let Ok(d) = load_from_toml(&env_name.to_uppercase()) {
                if let Ok(v) = d.try_into() {
                    return v;
                }
            }

            //3. Failure
            panic!("Env {} not found in environment or /config/general.toml. Program start failed.", env_name)
        }
    };
    ($($arg:tt)*) => {
        compile_error!("Too many arguments provided to load_env macro!");
    };
}

lazy_static! {
    /// The name of the app, rendered on the homepage.
    pub static ref APP_NAME: String = load_env!("APP_NAME");

    /// The path to the sqlite database file.
    pub static ref DATABASE_URL: String = load_env!("DATABASE_URL");

    /// The 256-bit base64 key used to sign and encrypt session cookies.
    pub static ref SECRET_KEY: String = load_env!("SECRET_KEY");

    /// The minimum accepted password length at registration.
    pub static ref MIN_PASSWORD_LENGTH: usize = load_env!("MIN_PASSWORD_LENGTH");

    /// The maximum accepted password length at registration.
    pub static ref MAX_PASSWORD_LENGTH: usize = load_env!("MAX_PASSWORD_LENGTH");

    /// The movies the database is seeded with on first run. There is no
    /// write route for movies, this list is the only source of them.
    pub static ref SEED_MOVIES: Vec<NewMovie> = {
        let file_path = PathType::Movies.get_path();
        let data = std::fs::read_to_string(&file_path).unwrap_or_else(|_| panic!("Unable to find {}", file_path));
        let f = data.parse::<toml::Value>().unwrap_or_else(|_| panic!("Unable to parse `{}`", file_path));

        let movies: &toml::value::Table = f.get("movie")
            .unwrap_or_else(|| panic!("Unable to parse {}, no movies provided!", file_path))
            .as_table()
            .unwrap_or_else(|| panic!("movie tag is not a table in {}", file_path));

        let mut seed: Vec<NewMovie> = vec![];
        for (key, value) in movies {
            let movie = value
                .as_table()
                .unwrap_or_else(|| panic!("Unable to parse movie {} from {}, is it correctly formatted?", key, file_path));

            let title = movie
                .get("title")
                .unwrap_or_else(|| panic!("Unable to parse title on {} from {}", key, file_path))
                .as_str()
                .unwrap_or_else(|| panic!("{}'s title is not a string in {}", key, file_path))
                .to_owned();

            let released = movie
                .get("released")
                .and_then(|v| v.as_str())
                .map(str::to_owned);

            let imdb_url = movie
                .get("imdb_url")
                .and_then(|v| v.as_str())
                .map(str::to_owned);

            seed.push(NewMovie {
                title,
                released,
                imdb_url,
            });
        }

        seed
    };
}

pub fn initialize_globals() {
    lazy_static::initialize(&APP_NAME);
    lazy_static::initialize(&DATABASE_URL);
    lazy_static::initialize(&SECRET_KEY);
    lazy_static::initialize(&MIN_PASSWORD_LENGTH);
    lazy_static::initialize(&MAX_PASSWORD_LENGTH);
    lazy_static::initialize(&SEED_MOVIES);
}
