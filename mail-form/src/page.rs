use axum::response::Html;

use crate::form::Acknowledgment;

const INDEX_HTML: &str = include_str!("../static/index.html");

pub fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Result page for submissions made without the browser script.
pub fn acknowledgment(ack: Acknowledgment) -> Html<String> {
    Html(format!(
        "<!doctype html>\n<html lang=\"en\">\n  <head><meta charset=\"utf-8\" /><title>{text}</title></head>\n  \
         <body>\n    <p role=\"alert\">{text}</p>\n    <a href=\"/\">Back to the form</a>\n  </body>\n</html>\n",
        text = ack.text()
    ))
}
