//! Instruction texts sent alongside the document.
//!
//! Two variants exist. The *manual* instruction summarises the PDF itself.
//! The *photo* instruction asks the model to identify the product from a
//! picture (usually the cover of the manual or the device) and to supply the
//! typical guidance for that class of product, since the photo alone rarely
//! carries the manual's text.
//!
//! Both demand a bare JSON object with exactly the keys of
//! [`crate::summary::SUMMARY_FIELDS`]; [`crate::pipeline::decode`] still strips
//! fences because models do not always comply.

use crate::config::Language;
use crate::document::MediaKind;

const JSON_SHAPE: &str = r#"{
  "product": "product name and model",
  "quickStart": "2-3 sentences: how to set up and start using it",
  "safety": "2-3 sentences: the most important safety warnings",
  "maintenance": "2-3 sentences: routine cleaning and upkeep",
  "troubleshooting": "2-3 sentences: common problems and their fixes"
}"#;

const OUTPUT_RULES: &str = r#"Reply with ONLY this JSON object. Every value must be a plain string.
Do NOT wrap the reply in ```json fences.
Do NOT add any text before or after the JSON."#;

/// Instruction for summarising a PDF manual.
pub fn manual_instruction(language: Language) -> String {
    format!(
        "Read this product manual and summarise it for a hurried user.\n\
         Write every value in {lang}.\n\n\
         Return a JSON object with exactly these five fields:\n{shape}\n\n{rules}",
        lang = language.name(),
        shape = JSON_SHAPE,
        rules = OUTPUT_RULES,
    )
}

/// Instruction for identifying a product from a photo.
pub fn photo_instruction(language: Language) -> String {
    format!(
        "This photo shows a product or the cover of its manual.\n\
         Identify the product as precisely as you can, then give the typical \
         guidance for this kind of product: the photo alone may not contain the \
         manual's text, so rely on what is usual for this product class.\n\
         Write every value in {lang}.\n\n\
         Return a JSON object with exactly these five fields:\n{shape}\n\n{rules}",
        lang = language.name(),
        shape = JSON_SHAPE,
        rules = OUTPUT_RULES,
    )
}

/// Pick the instruction matching the document kind.
pub fn instruction_for(kind: &MediaKind, language: Language) -> String {
    match kind {
        MediaKind::Pdf => manual_instruction(language),
        MediaKind::Image(_) => photo_instruction(language),
    }
}
