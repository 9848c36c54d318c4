//! Rendering merged transcript turns as plain text or a styled document.

use docx_rs::{Docx, Paragraph, Run};
use std::io::Cursor;

use super::{Speaker, TranscriptTurn};
use crate::error::PipelineError;

/// Render merged turns as `"<code>: <text>"` lines.
///
/// Total function: an empty turn sequence yields an empty string.
pub fn render_plain_text(turns: &[TranscriptTurn]) -> String {
    let mut out = String::new();

    for turn in turns {
        out.push_str(turn.speaker.code());
        out.push_str(": ");
        out.push_str(&turn.text);
        out.push('\n');
    }

    out
}

/// Render merged turns as a titled .docx document.
///
/// Moderator paragraphs are bold, responder paragraphs normal. An empty
/// turn sequence still produces a valid document with only the title.
pub fn render_document(turns: &[TranscriptTurn], title: &str) -> Result<Vec<u8>, PipelineError> {
    let mut docx = Docx::new().add_paragraph(
        Paragraph::new().add_run(Run::new().add_text(title).bold().size(32)),
    );

    for turn in turns {
        let mut run = Run::new().add_text(format!("{}: {}", turn.speaker.code(), turn.text));
        if turn.speaker == Speaker::Moderator {
            run = run.bold();
        }
        docx = docx.add_paragraph(Paragraph::new().add_run(run));
    }

    let mut buf = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buf)
        .map_err(|e| PipelineError::FormatFailed(e.to_string()))?;

    Ok(buf.into_inner())
}
