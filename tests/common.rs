use rand::{thread_rng, Rng};
use rocket::http::{ContentType, Status};
use rocket::local::blocking::Client;
use rocket::uri;

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

/// Generate a randomised alphanumeric (base 62) string of a requested length.
pub fn generate_random_alphanumeric(length: usize) -> String {
    thread_rng()
        .sample_iter(rand::distributions::Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}
