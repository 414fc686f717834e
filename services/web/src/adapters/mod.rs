pub mod answer_llm;
pub mod db;
pub mod files;

pub use answer_llm::GeminiAnswerAdapter;
pub use db::DbAdapter;
pub use files::LocalFileStore;
