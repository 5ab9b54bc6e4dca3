use std::collections::HashSet;

use rand::{thread_rng, Rng};
use rocket::http::{ContentType, Status};
use rocket::local::blocking::Client;
use rocket::uri;

//***** Helper Methods *****//

/// Register a fresh account with a random email, asserting the redirect to
/// the login page. Returns the credentials for follow-up requests.
pub fn create_test_account(client: &Client) -> (String, String) {
    let email = format!("{}@example.com", generate_random_alphanumeric(16));
    let password = String::from("User12356789");

    let response = client
        .post(uri!("/register"))
        .header(ContentType::Form)
        .body(format!("email={}&password={}", email, password))
        .dispatch();
    assert_eq!(response.status(), Status::SeeOther);
    assert_eq!(response.headers().get_one("Location"), Some("/login"));

    (email, password)
}

/// Log an account in on the given client, asserting success, and return the
/// user id parsed from the redirect target.
pub fn login_test_account(client: &Client, email: &str, password: &str) -> i32 {
    let response = client
        .post(uri!("/login"))
        .header(ContentType::Form)
        .body(format!("email={}&password={}", email, password))
        .dispatch();
    assert_eq!(response.status(), Status::SeeOther);

    let location = response
        .headers()
        .get_one("Location")
        .expect("a redirect target")
        .to_string();
    assert!(location.starts_with("/users/"), "unexpected redirect to {}", location);

    location
        .rsplit('/')
        .next()
        .and_then(|s| s.parse().ok())
        .expect("a user id in the redirect target")
}

/// Generate a randomised alphanumeric (base 62) string of a requested length.
pub fn generate_random_alphanumeric(length: usize) -> String {
    thread_rng()
        .sample_iter(rand::distributions::Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

#[test]
fn test_generate_random_alphanumeric() {
    //Note, there is a chance that we *could* get a string which has been generated before.
    //But that chance is infinitesimally small as to be negligible.
    let sample_size = 1000;
    let mut set: HashSet<String> = HashSet::default();
    for _ in 0..sample_size {
        let s = generate_random_alphanumeric(32);
        if set.contains(&s) {
            panic!("Duplicate key found in set");
        }
        set.insert(s);
    }
}
