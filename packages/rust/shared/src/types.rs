//! Core domain types: Notion pages, property values, content blocks, and the
//! flat metadata record extracted from a page.

use std::collections::HashMap;

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Rich text
// ---------------------------------------------------------------------------

/// One styled text run. Styling is discarded; only the text survives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RichText {
    /// Rendered text of the run, whatever its type.
    #[serde(default)]
    pub plain_text: String,
    /// Payload of `text`-typed runs. Mentions and equations have none.
    #[serde(default)]
    pub text: Option<TextContent>,
}

/// The `text` payload of a rich text run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TextContent {
    #[serde(default)]
    pub content: String,
}

impl RichText {
    /// A plain `text` run, as the API returns for unformatted content.
    pub fn plain(content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            plain_text: content.clone(),
            text: Some(TextContent { content }),
        }
    }
}

// ---------------------------------------------------------------------------
// Pages and properties
// ---------------------------------------------------------------------------

/// A page record as returned by the database query endpoint.
///
/// Properties are kept as raw JSON and decoded one by one on access, so a
/// single malformed property never prevents the page from syncing.
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    /// Notion page ID.
    pub id: String,
    /// Property bag keyed by property name.
    #[serde(default)]
    pub properties: HashMap<String, serde_json::Value>,
    /// ISO 8601 timestamp of the last edit.
    #[serde(default)]
    pub last_edited_time: Option<String>,
}

impl Page {
    /// Decode the named property, or `None` if it is missing or malformed.
    pub fn property(&self, name: &str) -> Option<PropertyValue> {
        let raw = self.properties.get(name)?;
        match serde_json::from_value(raw.clone()) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(page = %self.id, property = name, error = %e, "undecodable property");
                None
            }
        }
    }
}

/// The subset of Notion property types the exporter understands.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Title {
        #[serde(default)]
        title: Vec<RichText>,
    },
    RichText {
        #[serde(default)]
        rich_text: Vec<RichText>,
    },
    Select {
        select: Option<SelectOption>,
    },
    MultiSelect {
        #[serde(default)]
        multi_select: Vec<SelectOption>,
    },
    CreatedTime {
        created_time: Option<String>,
    },
    Formula {
        formula: Formula,
    },
    #[serde(other)]
    Other,
}

/// An option of a select or multi-select property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SelectOption {
    #[serde(default)]
    pub name: String,
}

/// Result of a formula property. Only string results are used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Formula {
    #[serde(default)]
    pub string: Option<String>,
}

// ---------------------------------------------------------------------------
// Blocks
// ---------------------------------------------------------------------------

/// One content block of a page body.
///
/// Kinds the renderer does not handle decode to [`Block::Unsupported`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Paragraph {
        paragraph: TextBlock,
    },
    #[serde(rename = "heading_1")]
    Heading1 {
        heading_1: TextBlock,
    },
    #[serde(rename = "heading_2")]
    Heading2 {
        heading_2: TextBlock,
    },
    #[serde(rename = "heading_3")]
    Heading3 {
        heading_3: TextBlock,
    },
    BulletedListItem {
        bulleted_list_item: TextBlock,
    },
    NumberedListItem {
        numbered_list_item: TextBlock,
    },
    Quote {
        quote: TextBlock,
    },
    Code {
        code: CodeBlock,
    },
    #[serde(other)]
    Unsupported,
}

/// Payload shared by every text-bearing block kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TextBlock {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
}

/// Payload of a code block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CodeBlock {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
    #[serde(default)]
    pub language: Option<String>,
}

impl TextBlock {
    /// A block payload holding a single plain run.
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            rich_text: vec![RichText::plain(content)],
        }
    }
}

// ---------------------------------------------------------------------------
// PageMetadata
// ---------------------------------------------------------------------------

/// Flat, fully-defaulted metadata for one page, ready for front-matter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMetadata {
    /// Page title, `"Untitled"` when absent.
    pub title: String,
    /// Category name, `"Uncategorized"` when absent.
    pub category: String,
    pub subcategory: Option<String>,
    pub language: Option<String>,
    /// Tag names in source order.
    pub tags: Vec<String>,
    /// First run of the summary, `None` when missing or empty.
    pub summary: Option<String>,
    /// Creation timestamp.
    pub created: Option<String>,
    /// Precomputed output path relative to the output root.
    pub sync_path: Option<String>,
    /// Last edit timestamp, empty when the page has none.
    pub last_edited: String,
}
