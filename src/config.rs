/// How query results are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderStyle {
    /// Bordered box table.
    #[default]
    Box,
    /// Comma-separated lines.
    Plain,
}

/// Settings of an interactive session.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Prompt shown when a new statement begins.
    pub prompt: String,
    /// Prompt shown while a statement continues over several lines.
    pub continuation_prompt: String,
    pub style: RenderStyle,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: "> ".to_string(),
            continuation_prompt: ".. ".to_string(),
            style: RenderStyle::default(),
        }
    }
}
