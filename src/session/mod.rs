use std::io::{BufRead, Write};

use tracing::{debug, info, warn};

use crate::kb::{AnswerSource, RetrievalError};
use crate::translator::{DetectionError, LanguageService, TranslationError};

const EXIT_COMMAND: &str = "exit";
const ENGLISH: &str = "en";

/// Failure of a single question's processing. Service-side variants are
/// caught at the loop boundary and rendered; I/O failures are re-raised
/// so a broken console is never masked as a request failure.
#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    #[error("{0}")]
    Retrieval(#[from] RetrievalError),

    #[error("{0}")]
    Detection(#[from] DetectionError),

    #[error("{0}")]
    Translation(#[from] TranslationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Interactive loop: read a question, retrieve answers, and per answer
/// detect the question's language and translate the answer when it is not
/// English. One question is fully processed before the next is read.
///
/// Ends on the exit sentinel (case-insensitive) or end of input.
pub async fn run<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    kb: &impl AnswerSource,
    languages: &impl LanguageService,
) -> std::io::Result<()> {
    writeln!(out, "Ask a question in any language, or type 'exit' to quit.")?;

    loop {
        writeln!(out, "Question: ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question.eq_ignore_ascii_case(EXIT_COMMAND) {
            break;
        }

        match process_question(out, question, kb, languages).await {
            Ok(()) => {}
            Err(TurnError::Io(e)) => return Err(e),
            Err(e) => {
                warn!(error = %e, "turn failed");
                writeln!(out, "Request error: {e}")?;
            }
        }
    }

    info!("session ended");
    Ok(())
}

/// One turn: every answer is rendered in the order the knowledge base
/// returned it. An error aborts the rest of the turn but leaves already
/// rendered output in place.
async fn process_question<W: Write>(
    out: &mut W,
    question: &str,
    kb: &impl AnswerSource,
    languages: &impl LanguageService,
) -> Result<(), TurnError> {
    debug!(question, "processing question");
    let answers = kb.answers(question).await?;

    for answer in &answers {
        debug!(confidence = answer.confidence, "rendering answer");

        // The detected language of the QUESTION decides whether the answer
        // gets translated; question and answer are assumed to share a
        // language.
        let language = languages.detect(question).await?;

        writeln!(out, "\nQuestion language: {language}\n")?;
        writeln!(out, "Question: {question}\n")?;
        writeln!(out, "Answer: {}\n", answer.text)?;

        if language == ENGLISH {
            writeln!(out, "The question is already in english.\n")?;
        } else {
            let translated = languages.translate(&answer.text, &language).await?;
            writeln!(out, "\nTranslation to {language}: {translated}\n")?;
        }
    }

    Ok(())
}
