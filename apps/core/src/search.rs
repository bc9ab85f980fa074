use serde::{Deserialize, Serialize};

use crate::model::{fold_case, VessloApp};

/// Non-name field that caused an app to match. Name matches qualify an app
/// but are not reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchedField {
    Developer,
    Memo,
    Tag,
}

impl MatchedField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Developer => "developer",
            Self::Memo => "memo",
            Self::Tag => "tag",
        }
    }

    pub fn tooltip(self) -> &'static str {
        match self {
            Self::Developer => "Matched: Developer",
            Self::Memo => "Matched: Memo",
            Self::Tag => "Matched: Tag",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult<'a> {
    pub app: &'a VessloApp,
    pub matched_fields: Vec<MatchedField>,
}

pub fn search<'a>(apps: &'a [VessloApp], query: &str) -> Vec<SearchResult<'a>> {
    let folded_query = fold_case(query);
    if folded_query.is_empty() {
        return apps
            .iter()
            .map(|app| SearchResult {
                app,
                matched_fields: Vec::new(),
            })
            .collect();
    }

    apps.iter()
        .filter_map(|app| classify(app, &folded_query))
        .collect()
}

fn classify<'a>(app: &'a VessloApp, folded_query: &str) -> Option<SearchResult<'a>> {
    let name_matches = contains_folded(&app.name, folded_query);

    let mut matched_fields = Vec::new();
    if app
        .developer
        .as_deref()
        .is_some_and(|developer| contains_folded(developer, folded_query))
    {
        matched_fields.push(MatchedField::Developer);
    }
    if app
        .memo
        .as_deref()
        .is_some_and(|memo| contains_folded(memo, folded_query))
    {
        matched_fields.push(MatchedField::Memo);
    }
    if app.tags.iter().any(|tag| contains_folded(tag, folded_query)) {
        matched_fields.push(MatchedField::Tag);
    }

    if name_matches || !matched_fields.is_empty() {
        Some(SearchResult {
            app,
            matched_fields,
        })
    } else {
        None
    }
}

fn contains_folded(haystack: &str, folded_query: &str) -> bool {
    fold_case(haystack).contains(folded_query)
}
