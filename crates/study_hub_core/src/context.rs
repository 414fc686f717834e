//! crates/study_hub_core/src/context.rs
//!
//! Builds the context buffer from the documents selected in the chat form,
//! wraps it into a prompt, and asks the answer generator.
//!
//! Nothing in here fails: unreadable files become inline notes in the context
//! and generator failures become the answer text.

use crate::extract::{extract_text, ExtractError, TextFormat};
use crate::ports::{AnswerGenerator, FileStore};

const PROMPT_PREAMBLE: &str = "The following documents were provided:";

/// Concatenates the text of each selected file under a `--- name ---` header.
///
/// Files are processed in the given order; a failure on one file appends an
/// `[Error reading ...]` note and moves on to the next.
pub async fn build_context(files: &dyn FileStore, selected: &[String]) -> String {
    let mut context = String::new();
    for filename in selected {
        // The file is opened before its format is looked at, so a missing
        // file reports an error even when the format is unsupported.
        let bytes = match files.read(filename).await {
            Ok(bytes) => bytes,
            Err(e) => {
                context.push_str(&format!("\n[Error reading {filename}: {e}]\n"));
                continue;
            }
        };

        let Some(format) = TextFormat::from_filename(filename) else {
            context.push_str(&format!("\n[Unsupported file format: {filename}]\n"));
            continue;
        };

        match extract_off_worker(bytes, format).await {
            Ok(text) => {
                context.push_str(&format!("\n\n--- {filename} ---\n"));
                context.push_str(&text);
            }
            Err(e) => context.push_str(&format!("\n[Error reading {filename}: {e}]\n")),
        }
    }
    context
}

/// PDF parsing is CPU-bound, so it runs on the blocking pool instead of the
/// worker serving the request.
async fn extract_off_worker(bytes: Vec<u8>, format: TextFormat) -> Result<String, ExtractError> {
    match format {
        TextFormat::Pdf => tokio::task::spawn_blocking(move || extract_text(bytes, format)).await?,
        TextFormat::Txt => extract_text(bytes, format),
    }
}

/// Wraps the context buffer and the user's verbatim question into one prompt.
pub fn build_prompt(context: &str, question: &str) -> String {
    format!("{PROMPT_PREAMBLE}\n{context}\n\nUser's question: {question}")
}

/// Runs the whole question-answering flow and returns the text to show.
pub async fn answer_question(
    generator: &dyn AnswerGenerator,
    files: &dyn FileStore,
    selected: &[String],
    question: &str,
) -> String {
    let context = build_context(files, selected).await;
    let prompt = build_prompt(&context, question);
    match generator.generate_answer(&prompt).await {
        Ok(answer) => answer.trim().to_string(),
        Err(e) => format!("⚠️ Answer generator error: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::tests::pdf_with_pages;
    use crate::ports::{PortError, PortResult};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryFiles(HashMap<String, Vec<u8>>);

    impl MemoryFiles {
        fn with(mut self, name: &str, bytes: impl AsRef<[u8]>) -> Self {
            self.0.insert(name.to_string(), bytes.as_ref().to_vec());
            self
        }
    }

    #[async_trait]
    impl FileStore for MemoryFiles {
        async fn save(&self, _filename: &str, _bytes: &[u8]) -> PortResult<()> {
            unreachable!("context building never writes")
        }

        async fn read(&self, filename: &str) -> PortResult<Vec<u8>> {
            self.0
                .get(filename)
                .cloned()
                .ok_or_else(|| PortError::NotFound(filename.to_string()))
        }
    }

    /// Records every prompt and replies with a fixed result.
    struct ScriptedGenerator {
        reply: Result<String, String>,
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl AnswerGenerator for ScriptedGenerator {
        async fn generate_answer(&self, prompt: &str) -> PortResult<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply.clone().map_err(PortError::Unexpected)
        }
    }

    fn selected(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[tokio::test]
    async fn txt_content_is_included_under_a_header() {
        let files = MemoryFiles::default().with("notes.txt", "Mitochondria make ATP.");
        let context = build_context(&files, &selected(&["notes.txt"])).await;
        assert_eq!(context, "\n\n--- notes.txt ---\nMitochondria make ATP.");
    }

    #[tokio::test]
    async fn unsupported_and_failing_files_do_not_stop_the_batch() {
        let files = MemoryFiles::default()
            .with("essay.docx", b"PK\x03\x04")
            .with("broken.txt", [0xffu8, 0xfe])
            .with("ok.txt", "still here");
        let context = build_context(
            &files,
            &selected(&["essay.docx", "missing.pdf", "broken.txt", "ok.txt"]),
        )
        .await;

        assert!(context.contains("[Unsupported file format: essay.docx]"));
        assert!(context.contains("[Error reading missing.pdf: Item not found: missing.pdf]"));
        assert!(context.contains("[Error reading broken.txt: invalid UTF-8 text"));
        assert!(context.ends_with("--- ok.txt ---\nstill here"));
    }

    #[tokio::test]
    async fn pdf_text_is_appended_page_by_page() {
        let pdf = pdf_with_pages(&["Krebs cycle", "Electron transport"]);
        let files = MemoryFiles::default().with("bio.pdf", pdf);
        let context = build_context(&files, &selected(&["bio.pdf"])).await;

        assert!(context.starts_with("\n\n--- bio.pdf ---\n"));
        let krebs = context.find("Krebs cycle").unwrap();
        let electron = context.find("Electron transport").unwrap();
        assert!(krebs < electron);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn pdf_and_text_mix_keeps_selection_order_on_a_worker_pool() {
        let files = MemoryFiles::default()
            .with("a.pdf", pdf_with_pages(&["Glycolysis"]))
            .with("b.txt", "Fermentation")
            .with("broken.pdf", "not a pdf");
        let context =
            build_context(&files, &selected(&["a.pdf", "b.txt", "broken.pdf"])).await;

        let glycolysis = context.find("Glycolysis").unwrap();
        let fermentation = context.find("--- b.txt ---\nFermentation").unwrap();
        assert!(glycolysis < fermentation);
        assert!(context.contains("\n[Error reading broken.pdf: PDF extraction failed: "));
    }

    #[tokio::test]
    async fn no_selection_gives_empty_context() {
        let files = MemoryFiles::default();
        assert_eq!(build_context(&files, &[]).await, "");
    }

    #[test]
    fn prompt_wraps_context_and_question() {
        assert_eq!(
            build_prompt("\n\n--- a.txt ---\nA", "What is A?"),
            "The following documents were provided:\n\n\n--- a.txt ---\nA\n\nUser's question: What is A?"
        );
    }

    #[tokio::test]
    async fn answer_is_trimmed_and_prompt_is_forwarded() {
        let files = MemoryFiles::default().with("a.txt", "alpha");
        let generator = ScriptedGenerator {
            reply: Ok("  Alpha is the first letter.\n".to_string()),
            prompts: Mutex::new(Vec::new()),
        };
        let answer =
            answer_question(&generator, &files, &selected(&["a.txt"]), "What is alpha?").await;

        assert_eq!(answer, "Alpha is the first letter.");
        let prompts = generator.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("--- a.txt ---\nalpha"));
        assert!(prompts[0].ends_with("User's question: What is alpha?"));
    }

    #[tokio::test]
    async fn generator_failure_becomes_the_answer() {
        let files = MemoryFiles::default();
        let generator = ScriptedGenerator {
            reply: Err("quota exceeded".to_string()),
            prompts: Mutex::new(Vec::new()),
        };
        let answer = answer_question(&generator, &files, &[], "anything?").await;

        assert!(answer.starts_with("⚠️ Answer generator error:"));
        assert!(answer.contains("quota exceeded"));
    }
}
