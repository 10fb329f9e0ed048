//! Drawing tool selection.

/// The active tool decides what a pointer gesture does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Freehand stroke following the pointer
    #[default]
    Pen,
    /// Line with an arrowhead at the release point
    Arrow,
    /// Straight line between press and release
    Line,
    /// Rectangle from corner to corner
    Square,
    /// Ellipse inscribed in the dragged box
    Circle,
    /// Text block placed at the press point
    Text,
    /// Select, move and resize existing annotations
    Select,
    /// Translucent marker stroke
    Highlighter,
    /// Pixelated box hiding what is underneath
    Censor,
    /// Numbered badge placed on click
    Number,
}

impl Tool {
    pub const ALL: [Tool; 10] = [
        Tool::Pen,
        Tool::Arrow,
        Tool::Line,
        Tool::Square,
        Tool::Circle,
        Tool::Text,
        Tool::Select,
        Tool::Highlighter,
        Tool::Censor,
        Tool::Number,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Tool::Pen => "pen",
            Tool::Arrow => "arrow",
            Tool::Line => "line",
            Tool::Square => "square",
            Tool::Circle => "circle",
            Tool::Text => "text",
            Tool::Select => "select",
            Tool::Highlighter => "highlighter",
            Tool::Censor => "censor",
            Tool::Number => "number",
        }
    }

    /// Parses a tool name as written in the config file (case-insensitive).
    pub fn from_name(name: &str) -> Option<Tool> {
        Tool::ALL
            .into_iter()
            .find(|tool| tool.name().eq_ignore_ascii_case(name.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for tool in Tool::ALL {
            assert_eq!(Tool::from_name(tool.name()), Some(tool));
        }
        assert_eq!(Tool::from_name(" Highlighter "), Some(Tool::Highlighter));
        assert_eq!(Tool::from_name("lasso"), None);
    }
}
