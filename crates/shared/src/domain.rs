use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Document {
    pub name: String,
}

impl Document {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

fn first_page() -> u32 {
    1
}

/// A pointer from an answer back to the page and excerpt that justifies it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCitation {
    pub filename: String,
    #[serde(default = "first_page")]
    pub page_number: u32,
    #[serde(default)]
    pub text: String,
}

impl SourceCitation {
    pub fn new(filename: impl Into<String>, page_number: u32, text: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            page_number,
            text: text.into(),
        }
    }

    /// Page the viewer should land on; the backend may report page 0 for
    /// unpaged chunks.
    pub fn start_page(&self) -> u32 {
        self.page_number.max(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Turn {
    User {
        content: String,
    },
    Assistant {
        content: String,
        #[serde(default)]
        sources: Vec<SourceCitation>,
    },
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self::User {
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>, sources: Vec<SourceCitation>) -> Self {
        Self::Assistant {
            content: content.into(),
            sources,
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Self::User { content } | Self::Assistant { content, .. } => content,
        }
    }

    pub fn sources(&self) -> &[SourceCitation] {
        match self {
            Self::User { .. } => &[],
            Self::Assistant { sources, .. } => sources,
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Self::User { .. })
    }
}
