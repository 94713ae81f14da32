use super::error::NotificationError;
use isahc::{Body, Error, HttpClient, Request, Response};
use log::*;
#[cfg(test)]
use mockall::automock;
use std::io::Read;
use url::form_urlencoded;

pub const DEFAULT_ENDPOINT: &str = "https://api.prowlapp.com/publicapi/add";
pub const DEFAULT_APPLICATION: &str = "Interface Sender";

const MAX_APPLICATION: usize = 256;
const MAX_EVENT: usize = 1024;
const MAX_DESCRIPTION: usize = 10000;

/// Builds its client when the request is sent, so setup failures surface as send errors.
pub struct MyHttpClient;

#[cfg_attr(test, automock)]
trait SendsHttp {
    fn send(&self, request: Request<Vec<u8>>) -> Result<Response<Body>, Error>;
}
impl SendsHttp for MyHttpClient {
    fn send(&self, request: Request<Vec<u8>>) -> Result<Response<Body>, Error> {
        HttpClient::new()?.send(request)
    }
}

#[cfg_attr(test, automock)]
pub trait Notifies {
    fn notify(&self, api_key: &str, event: &str, description: &str) -> Result<(), NotificationError>;
}

pub struct Prowl {
    http_client: Box<dyn SendsHttp + Sync>,
    endpoint: String,
    application: String,
}

impl Prowl {
    pub fn new(endpoint: &str, application: &str) -> Self {
        Prowl {
            http_client: Box::new(MyHttpClient),
            endpoint: endpoint.to_owned(),
            application: application.to_owned(),
        }
    }

    fn form_body(&self, api_key: &str, event: &str, description: &str) -> Vec<u8> {
        form_urlencoded::Serializer::new(String::new())
            .append_pair("apikey", api_key)
            .append_pair("application", truncate(&self.application, MAX_APPLICATION))
            .append_pair("event", truncate(event, MAX_EVENT))
            .append_pair("description", truncate(description, MAX_DESCRIPTION))
            .append_pair("priority", "0")
            .finish()
            .into_bytes()
    }
}

impl Notifies for Prowl {
    fn notify(&self, api_key: &str, event: &str, description: &str) -> Result<(), NotificationError> {
        let req = Request::post(self.endpoint.as_str())
            .header("content-type", "application/x-www-form-urlencoded")
            .body(self.form_body(api_key, event, description))?;
        let mut res = self.http_client.send(req)?;
        let mut body = String::new();
        res.body_mut().read_to_string(&mut body)?;
        if !res.status().is_success() {
            return Err(NotificationError::Rejected {
                status: res.status().as_u16(),
                message: error_message(&body).unwrap_or(body.trim()).to_owned(),
            });
        }
        match xml_attribute(&body, "remaining") {
            Some(remaining) => info!("Prowl accepted the notification, {remaining} calls remaining."),
            None => info!("Response: status code: {status}. Body: {body}", status = res.status()),
        }
        Ok(())
    }
}

fn truncate(value: &str, max_chars: usize) -> &str {
    match value.char_indices().nth(max_chars) {
        Some((index, _)) => {
            warn!("Truncating field to {max_chars} characters.");
            &value[..index]
        }
        None => value,
    }
}

/// Text of the `<error code="...">...</error>` element of a Prowl reply.
fn error_message(body: &str) -> Option<&str> {
    let start = body.find("<error")?;
    let open_end = start + body[start..].find('>')? + 1;
    let close = open_end + body[open_end..].find("</error>")?;
    Some(body[open_end..close].trim())
}

fn xml_attribute<'a>(body: &'a str, name: &str) -> Option<&'a str> {
    let marker = format!("{name}=\"");
    let start = body.find(&marker)? + marker.len();
    let end = start + body[start..].find('"')?;
    Some(&body[start..end])
}
