mod support;

use vesslo_core::actions::AppAction;
use vesslo_core::contract::{
    bulk_header_item, update_item, CoreRequest, ListItemDto, RunRequest, SearchRequest,
    SectionDto, UpdatesRequest,
};
use vesslo_core::search::search;
use vesslo_core::updates::{sections, SortOption};

#[test]
fn requests_use_kind_and_payload_envelope() {
    let encoded = serde_json::to_value(CoreRequest::Search(SearchRequest {
        query: "arc".into(),
    }))
    .unwrap();
    assert_eq!(
        encoded,
        serde_json::json!({"kind": "search", "payload": {"query": "arc"}})
    );

    let encoded = serde_json::to_value(CoreRequest::Updates(UpdatesRequest {
        sort: Some(SortOption::Developer),
    }))
    .unwrap();
    assert_eq!(encoded["payload"]["sort"], "developer");

    let decoded: CoreRequest = serde_json::from_str(
        r#"{"kind":"run","payload":{"action":{"type":"update_all_homebrew"}}}"#,
    )
    .unwrap();
    assert_eq!(
        decoded,
        CoreRequest::Run(RunRequest {
            action: AppAction::UpdateAllHomebrew
        })
    );
}

#[test]
fn search_items_carry_row_reasons_and_actions() {
    let apps = support::fixture_apps();
    let results = search(&apps, "browser");
    let item = ListItemDto::from(&results[0]);

    assert_eq!(item.app_id, "arc");
    assert_eq!(item.row.title, "Arc");
    assert_eq!(item.matched_fields.len(), 3);
    assert_eq!(
        item.actions.last().unwrap().title.as_deref(),
        Some("Tags")
    );
}

#[test]
fn empty_reasons_are_omitted_from_json() {
    let apps = support::fixture_apps();
    let value = serde_json::to_value(update_item(&apps[0])).unwrap();
    assert!(value.get("matched_fields").is_none());
    assert_eq!(value["row"]["accessories"][1]["kind"], "tag");
    assert_eq!(value["row"]["accessories"][1]["value"], "brew");
}

#[test]
fn section_dto_keeps_kind_and_title() {
    let apps = support::fixture_apps();
    let dtos: Vec<SectionDto> = sections(&apps, SortOption::Source)
        .iter()
        .map(Into::into)
        .collect();

    let titles: Vec<&str> = dtos.iter().map(|dto| dto.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["Homebrew (3)", "Sparkle (1)", "App Store (2)", "Manual (1)"]
    );
    assert_eq!(dtos[2].items[1].app_id, "onepassword");
}

#[test]
fn bulk_header_item_runs_update_all() {
    let item = bulk_header_item(2);
    assert_eq!(item.app_id, "update-all-homebrew");
    assert_eq!(item.actions[0].actions[0].action, AppAction::UpdateAllHomebrew);
}
