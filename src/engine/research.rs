use crate::types::records::ChecklistItem;

const RESEARCH_ID_SUFFIX: &str = "-research";
const RESEARCH_KEYWORD: &str = "research";

/// True only when the checklist has a research item and that item is done.
pub fn research_done(checklist: Option<&[ChecklistItem]>) -> bool {
    checklist
        .and_then(|items| items.iter().find(|item| is_research_item(item)))
        .map(|item| item.done)
        .unwrap_or(false)
}

fn is_research_item(item: &ChecklistItem) -> bool {
    item.id.ends_with(RESEARCH_ID_SUFFIX) || item.text.to_lowercase().contains(RESEARCH_KEYWORD)
}
