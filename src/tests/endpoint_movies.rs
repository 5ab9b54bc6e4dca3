use super::common::*;
use crate::rocket;
use rocket::http::{ContentType, Status};
use rocket::local::blocking::Client;
use rocket::uri;

#[test]
fn movie_detail_renders_rating_form() {
    let client = Client::tracked(rocket()).expect("valid rocket instance");
    let response = client.get(uri!("/movies/1")).dispatch();
    assert_eq!(response.status(), Status::Ok);
    assert!(response.into_string().unwrap().contains("Rate this movie"));
}

#[test]
fn rating_requires_login() {
    let client = Client::tracked(rocket()).expect("valid rocket instance");
    let response = client
        .post(uri!("/movies/1"))
        .header(ContentType::Form)
        .body("score=4")
        .dispatch();
    assert_eq!(response.status(), Status::SeeOther);
    assert_eq!(response.headers().get_one("Location"), Some("/login"));
}

#[test]
fn rating_unknown_movie_is_not_found() {
    let client = Client::tracked(rocket()).expect("valid rocket instance");
    let (email, password) = create_test_account(&client);
    login_test_account(&client, &email, &password);

    let response = client
        .post(uri!("/movies/999999999"))
        .header(ContentType::Form)
        .body("score=4")
        .dispatch();
    assert_eq!(response.status(), Status::NotFound);
}

#[test]
fn rating_rejects_out_of_range_score() {
    let client = Client::tracked(rocket()).expect("valid rocket instance");
    let (email, password) = create_test_account(&client);
    login_test_account(&client, &email, &password);

    let response = client
        .post(uri!("/movies/1"))
        .header(ContentType::Form)
        .body("score=9")
        .dispatch();
    assert_eq!(response.status(), Status::SeeOther);
    assert_eq!(response.headers().get_one("Location"), Some("/movies/1"));
}

#[test]
fn rating_upserts_rather_than_duplicating() {
    let client = Client::tracked(rocket()).expect("valid rocket instance");
    let (email, password) = create_test_account(&client);
    let id = login_test_account(&client, &email, &password);

    //First rating inserts a row
    let response = client
        .post(uri!("/movies/2"))
        .header(ContentType::Form)
        .body("score=4")
        .dispatch();
    assert_eq!(response.status(), Status::SeeOther);
    assert_eq!(response.headers().get_one("Location"), Some("/movies"));

    let body = client
        .get(format!("/users/{}", id))
        .dispatch()
        .into_string()
        .unwrap();
    assert_eq!(body.matches("class=\"score\"").count(), 1);
    assert!(body.contains("<td class=\"score\">4</td>"));

    //Second rating for the same movie overwrites the score in place
    let response = client
        .post(uri!("/movies/2"))
        .header(ContentType::Form)
        .body("score=5")
        .dispatch();
    assert_eq!(response.status(), Status::SeeOther);
    assert_eq!(response.headers().get_one("Location"), Some("/movies"));

    let body = client
        .get(format!("/users/{}", id))
        .dispatch()
        .into_string()
        .unwrap();
    assert_eq!(body.matches("class=\"score\"").count(), 1);
    assert!(body.contains("<td class=\"score\">5</td>"));

    //The movie page shows the rater's email
    let body = client
        .get(uri!("/movies/2"))
        .dispatch()
        .into_string()
        .unwrap();
    assert!(body.contains(&email));
}
