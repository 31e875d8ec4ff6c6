//! Page metadata extraction.
//!
//! Decodes the fixed set of database properties into a [`PageMetadata`]
//! record in one pass. Each field defaults independently; a missing or
//! malformed property never fails extraction.

use notionsync_shared::{Page, PageMetadata, PropertyValue, RichText};

const TITLE: &str = "Title";
const CATEGORY: &str = "Category";
const SUBCATEGORY: &str = "Subcategory";
const LANGUAGE: &str = "Language";
const TAGS: &str = "Tags";
const SUMMARY: &str = "Summary";
const CREATED: &str = "Created";
const SYNC_PATH: &str = "Sync_Path";

const DEFAULT_TITLE: &str = "Untitled";
const DEFAULT_CATEGORY: &str = "Uncategorized";

/// Extract the flat metadata record for a page.
pub fn extract_metadata(page: &Page) -> PageMetadata {
    let title = match page.property(TITLE) {
        Some(PropertyValue::Title { title }) => first_plain_text(&title),
        _ => None,
    };

    let tags = match page.property(TAGS) {
        Some(PropertyValue::MultiSelect { multi_select }) => {
            multi_select.into_iter().map(|o| o.name).collect()
        }
        _ => Vec::new(),
    };

    let summary = match page.property(SUMMARY) {
        Some(PropertyValue::RichText { rich_text }) => {
            first_plain_text(&rich_text).filter(|s| !s.is_empty())
        }
        _ => None,
    };

    let created = match page.property(CREATED) {
        Some(PropertyValue::CreatedTime { created_time }) => created_time,
        _ => None,
    };

    let sync_path = match page.property(SYNC_PATH) {
        Some(PropertyValue::Formula { formula }) => formula.string.filter(|s| !s.is_empty()),
        _ => None,
    };

    PageMetadata {
        title: title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        category: select_name(page, CATEGORY).unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        subcategory: select_name(page, SUBCATEGORY),
        language: select_name(page, LANGUAGE),
        tags,
        summary,
        created,
        sync_path,
        last_edited: page.last_edited_time.clone().unwrap_or_default(),
    }
}

fn select_name(page: &Page, name: &str) -> Option<String> {
    match page.property(name) {
        Some(PropertyValue::Select {
            select: Some(option),
        }) => Some(option.name),
        _ => None,
    }
}

fn first_plain_text(runs: &[RichText]) -> Option<String> {
    runs.first().map(|run| run.plain_text.clone())
}
