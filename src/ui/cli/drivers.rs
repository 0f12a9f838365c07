use anyhow::Result;

/// Source of interactive answers, so sessions can be scripted in tests.
pub trait PromptDriver {
    /// Free-text answer; `None` when the user skips the prompt.
    fn text(&self, message: &str, help: Option<&str>) -> Result<Option<String>>;
}

pub struct InquireDriver;

impl PromptDriver for InquireDriver {
    fn text(&self, message: &str, help: Option<&str>) -> Result<Option<String>> {
        let mut prompt = inquire::Text::new(message);
        if let Some(help) = help {
            prompt = prompt.with_help_message(help);
        }
        Ok(prompt.prompt_skippable()?)
    }
}
