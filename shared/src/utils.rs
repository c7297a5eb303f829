use lambda_http::http::StatusCode;
use lambda_http::{Error, Response};
use serde::Serialize;

pub fn empty_response(status: &StatusCode) -> Result<Response<String>, Error> {
    let response = Response::builder()
        .status(*status)
        .body(String::new())
        .map_err(Box::new)?;

    Ok(response)
}

pub fn json_response(status: &StatusCode, body: &impl Serialize) -> Result<Response<String>, Error> {
    let response = Response::builder()
        .status(*status)
        .header("content-type", "application/json")
        .body(serde_json::to_string(body)?)
        .map_err(Box::new)?;

    Ok(response)
}
