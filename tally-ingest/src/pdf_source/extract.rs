//! Walk PDF content streams and collect positioned text.

use pdf::content::Operation;
use pdf::file::File as PdfFile;
use pdf::primitive::Primitive;
use tracing::debug;

use super::layout::TextFragment;
use crate::error::{IngestError, Result};

/// Kerning (thousandths of a text unit) wide enough to read as a word gap
const WORD_GAP: f32 = -200.0;

/// Text-object state needed to place fragments
#[derive(Debug, Default)]
struct TextCursor {
    /// Start of the current line; drawing does not advance it
    x: f32,
    y: f32,
    leading: f32,
    /// The last draw left the cursor in place, so the next draw continues it
    continues: bool,
}

impl TextCursor {
    fn move_to(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
        self.continues = false;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.move_to(self.x + tx, self.y + ty);
    }

    fn newline(&mut self) {
        self.move_to(self.x, self.y - self.leading);
    }

    fn draw(&mut self, text: String, out: &mut Vec<TextFragment>) {
        if text.is_empty() {
            return;
        }
        let was_continuing = std::mem::replace(&mut self.continues, true);
        if was_continuing {
            if let Some(last) = out.last_mut() {
                last.text.push_str(&text);
                return;
            }
        }
        out.push(TextFragment::new(self.x, self.y, text));
    }
}

fn number(p: &Primitive) -> Option<f32> {
    match p {
        Primitive::Integer(n) => Some(*n as f32),
        Primitive::Number(n) => Some(*n),
        _ => None,
    }
}

fn string(p: &Primitive) -> Option<String> {
    match p {
        Primitive::String(s) => Some(String::from_utf8_lossy(s.as_bytes()).into_owned()),
        _ => None,
    }
}

/// Operand `idx` counted from the end; operators take their operands last-first
fn operand_from_end(op: &Operation, idx: usize) -> Option<&Primitive> {
    op.operands.iter().rev().nth(idx)
}

/// `TJ` array: strings joined, large negative kerning becomes a space
fn adjusted_text(items: &[Primitive]) -> String {
    let mut s = String::new();
    for item in items {
        if let Some(t) = string(item) {
            s.push_str(&t);
        } else if number(item).is_some_and(|n| n <= WORD_GAP) {
            s.push(' ');
        }
    }
    s
}

/// Positioned text fragments for one page's content operations
pub fn fragments_from_ops(ops: &[Operation]) -> Vec<TextFragment> {
    let mut out = Vec::new();
    let mut cursor = TextCursor::default();

    for op in ops {
        let n = |idx| operand_from_end(op, idx).and_then(number);
        match op.operator.as_str() {
            "BT" => cursor.move_to(0.0, 0.0),
            "Tm" => {
                if let (Some(e), Some(f)) = (n(1), n(0)) {
                    cursor.move_to(e, f);
                }
            }
            "Td" => {
                if let (Some(tx), Some(ty)) = (n(1), n(0)) {
                    cursor.translate(tx, ty);
                }
            }
            "TD" => {
                if let (Some(tx), Some(ty)) = (n(1), n(0)) {
                    cursor.leading = -ty;
                    cursor.translate(tx, ty);
                }
            }
            "TL" => {
                if let Some(leading) = n(0) {
                    cursor.leading = leading;
                }
            }
            "T*" => cursor.newline(),
            "Tj" => {
                if let Some(text) = operand_from_end(op, 0).and_then(string) {
                    cursor.draw(text, &mut out);
                }
            }
            "'" | "\"" => {
                cursor.newline();
                if let Some(text) = operand_from_end(op, 0).and_then(string) {
                    cursor.draw(text, &mut out);
                }
            }
            "TJ" => {
                if let Some(Primitive::Array(items)) = operand_from_end(op, 0) {
                    cursor.draw(adjusted_text(items), &mut out);
                }
            }
            _ => {}
        }
    }

    out
}

/// Open a (possibly encrypted) PDF and return the text fragments of every page.
///
/// Any open, decrypt or content-stream error aborts the whole extraction.
pub fn extract_pages(bytes: &[u8], password: Option<&str>) -> Result<Vec<Vec<TextFragment>>> {
    let password = password.unwrap_or("");
    let file = PdfFile::<Vec<u8>>::from_data_password(bytes.to_vec(), password.as_bytes())
        .map_err(|e| {
            IngestError::Pdf(if password.is_empty() {
                format!("failed to open document: {e}")
            } else {
                format!("failed to open document (check the password): {e}")
            })
        })?;

    let mut pages = Vec::new();
    for (idx, page) in file.pages().enumerate() {
        let page_no = idx + 1;
        let page = page.map_err(|e| IngestError::Pdf(format!("page {page_no}: {e}")))?;
        let Some(content) = &page.contents else {
            pages.push(Vec::new());
            continue;
        };
        let fragments = fragments_from_ops(&content.operations);
        debug!(page = page_no, fragments = fragments.len(), "extracted page text");
        pages.push(fragments);
    }

    Ok(pages)
}
