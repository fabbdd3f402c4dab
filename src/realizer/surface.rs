//! Surface realization: flatten the fully realized tree into paragraph and
//! sentence text. The document plan has paragraphs as root children and
//! one message per sentence below them.

use regex::Regex;

use crate::error::RealizeError;
use crate::model::PlanNode;

/// Delimiters wrapped around paragraphs and sentences.
#[derive(Debug, Clone)]
pub struct SurfaceFormat {
    pub paragraph_start: &'static str,
    pub paragraph_end: &'static str,
    pub sentence_start: &'static str,
    pub sentence_end: &'static str,
    pub fail_on_empty: bool,
}

impl SurfaceFormat {
    /// Bare text, for headlines. An empty headline is an error.
    pub fn headline() -> Self {
        Self {
            paragraph_start: "",
            paragraph_end: "",
            sentence_start: "",
            sentence_end: "",
            fail_on_empty: true,
        }
    }

    /// HTML body: `<p>` paragraphs with period-terminated sentences.
    pub fn body_html() -> Self {
        Self {
            paragraph_start: "<p>",
            paragraph_end: "</p>",
            sentence_start: "",
            sentence_end: ". ",
            fail_on_empty: false,
        }
    }
}

pub struct SurfaceRealizer {
    space_before_close: Regex,
    space_after_open: Regex,
    space_before_comma: Regex,
}

impl SurfaceRealizer {
    pub fn new() -> Result<Self, crate::error::ConfigError> {
        Ok(Self {
            space_after_open: Regex::new(r"\(\s")?,
            space_before_close: Regex::new(r"\s\)")?,
            space_before_comma: Regex::new(r"\s,")?,
        })
    }

    pub fn realize(&self, plan: &PlanNode, format: &SurfaceFormat) -> Result<String, RealizeError> {
        let mut output = String::new();
        for paragraph in plan.children() {
            let text = self.realize_paragraph(paragraph, format)?;
            output.push_str(format.paragraph_start);
            output.push_str(&text);
            output.push_str(format.paragraph_end);
        }
        Ok(output)
    }

    fn realize_paragraph(
        &self,
        paragraph: &PlanNode,
        format: &SurfaceFormat,
    ) -> Result<String, RealizeError> {
        let mut output = String::new();
        for message in paragraph.leaves() {
            let template = match &message.template {
                Some(template) => template,
                None => continue,
            };

            let mut sentence = template
                .components
                .iter()
                .map(|c| c.value())
                .filter(|v| !v.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
                .trim_end()
                .to_string();

            sentence = self.space_after_open.replace_all(&sentence, "(").to_string();
            sentence = self.space_before_close.replace_all(&sentence, ")").to_string();
            sentence = self.space_before_comma.replace_all(&sentence, ",").to_string();

            if sentence.is_empty() {
                if format.fail_on_empty {
                    return Err(RealizeError::EmptySentence);
                }
                continue;
            }

            let mut chars = sentence.chars();
            let capitalized = match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => sentence,
            };

            output.push_str(format.sentence_start);
            output.push_str(&capitalized);
            output.push_str(format.sentence_end);
        }
        Ok(output)
    }
}
