//! services/web/src/web/flash.rs
//!
//! One-shot notices shown on the page after a redirect. Only a short code
//! travels in the cookie; the message text stays on the server.

use crate::web::cookies::{flash_cookie, read_cookie, FLASH_COOKIE};
use axum::{
    http::{header, HeaderMap},
    response::{IntoResponse, Redirect, Response},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
    NoFilePart,
    NoSelectedFile,
    FileTypeNotAllowed,
    UploadSucceeded,
    RegistrationSucceeded,
}

impl Flash {
    const ALL: [Flash; 5] = [
        Flash::NoFilePart,
        Flash::NoSelectedFile,
        Flash::FileTypeNotAllowed,
        Flash::UploadSucceeded,
        Flash::RegistrationSucceeded,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Flash::NoFilePart => "no_file_part",
            Flash::NoSelectedFile => "no_selected_file",
            Flash::FileTypeNotAllowed => "file_type_not_allowed",
            Flash::UploadSucceeded => "upload_succeeded",
            Flash::RegistrationSucceeded => "registration_succeeded",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Flash::NoFilePart => "No file part",
            Flash::NoSelectedFile => "No selected file",
            Flash::FileTypeNotAllowed => "File type not allowed",
            Flash::UploadSucceeded => "File uploaded successfully",
            Flash::RegistrationSucceeded => "Registration successful",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.code() == code)
    }

    /// The pending flash carried by the request, if any.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        read_cookie(headers, FLASH_COOKIE).and_then(Self::from_code)
    }
}

/// Redirects to `to`, leaving `flash` for the next page render.
pub fn redirect_with_flash(to: &str, flash: Flash) -> Response {
    (
        [(header::SET_COOKIE, flash_cookie(flash.code()))],
        Redirect::to(to),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn pending_flash_is_read_from_the_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("flash=upload_succeeded"),
        );
        assert_eq!(Flash::from_headers(&headers), Some(Flash::UploadSucceeded));

        headers.insert(header::COOKIE, HeaderValue::from_static("flash=%3Cscript%3E"));
        assert_eq!(Flash::from_headers(&headers), None);
    }
}
