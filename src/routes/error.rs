use rocket::serde::Serialize;
use rocket::serde::json::Json;
use rocket::{Request, catch};

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct Error {
    pub error: String,
}

fn error(message: &str) -> Json<Error> {
    Json(Error { error: message.to_string() })
}

#[catch(400)]
pub fn bad_request(_: &Request) -> Json<Error> {
    error("Bad request")
}

#[catch(401)]
pub fn unauthorized(_: &Request) -> Json<Error> {
    error("Unauthorized")
}

#[catch(404)]
pub fn not_found(_: &Request) -> Json<Error> {
    error("Not found")
}

#[catch(405)]
pub fn method_not_allowed(_: &Request) -> Json<Error> {
    error("Method not allowed")
}

#[catch(409)]
pub fn conflict(_: &Request) -> Json<Error> {
    error("Conflict")
}

#[catch(422)]
pub fn unprocessable_entity(_: &Request) -> Json<Error> {
    error("Malformed request body")
}

#[catch(500)]
pub fn internal_error(_: &Request) -> Json<Error> {
    error("Internal server error")
}

pub fn catchers() -> Vec<rocket::Catcher> {
    rocket::catchers![bad_request, unauthorized, not_found, method_not_allowed, conflict, unprocessable_entity, internal_error]
}
