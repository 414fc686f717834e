//! services/web/src/web/api_doc.rs
//!
//! The master definition for the OpenAPI description of the HTTP surface.

use crate::web::{auth, chat, documents};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        documents::index_handler,
        documents::upload_handler,
        documents::download_handler,
        chat::chat_page,
        chat::chat_handler,
        auth::login_page,
        auth::login_handler,
        auth::register_page,
        auth::register_handler,
        auth::logout_handler,
    ),
    components(
        schemas(auth::CredentialsForm, documents::DocumentView)
    ),
    tags(
        (name = "Study Hub", description = "Shared study documents and questions answered from them.")
    )
)]
pub struct ApiDoc;
