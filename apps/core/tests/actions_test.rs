mod support;

use vesslo_core::actions::{
    app_actions, app_row, bulk_actions, bulk_header_row, tag_row, update_actions, update_row,
    Accessory, AppAction, ListContext, Tint,
};
use vesslo_core::model::VessloApp;
use vesslo_core::search::MatchedField;
use vesslo_core::tags::tag_groups;

fn app(id: &str) -> VessloApp {
    support::fixture_apps()
        .into_iter()
        .find(|app| app.id == id)
        .expect("fixture app")
}

fn titles(sections: &[vesslo_core::actions::ActionSection]) -> Vec<Vec<String>> {
    sections
        .iter()
        .map(|section| section.actions.iter().map(|a| a.title.clone()).collect())
        .collect()
}

#[test]
fn search_panel_offers_update_and_tag_navigation() {
    let arc = app("arc");
    let sections = app_actions(&arc, ListContext::Search);

    assert_eq!(
        titles(&sections),
        vec![
            vec!["Open App", "Show in Finder"],
            vec!["Open in Vesslo", "Copy Bundle Id"],
            vec!["Update via Homebrew"],
            vec!["Browse #browser", "Browse #daily"],
        ]
    );
    assert_eq!(sections[2].title.as_deref(), Some("Update"));
    assert_eq!(
        sections[2].actions[0].action,
        AppAction::UpdateViaHomebrew {
            cask: "arc".into(),
            app_name: "Arc".into()
        }
    );
    assert_eq!(
        sections[3].actions[1].action,
        AppAction::BrowseTag {
            tag: "daily".into()
        }
    );
}

#[test]
fn drill_down_panel_skips_update_when_current() {
    let slack = app("slack");
    let sections = app_actions(&slack, ListContext::TagDrillDown);

    assert_eq!(
        titles(&sections),
        vec![
            vec!["Open App", "Show in Finder"],
            vec!["Open in Vesslo", "Copy Bundle Id"],
            vec!["Back to Tags"],
        ]
    );
    assert_eq!(sections[2].actions[0].action, AppAction::BackToTags);
}

#[test]
fn vesslo_actions_need_bundle_id() {
    let mut arc = app("arc");
    arc.bundle_id = Some(" ".into());
    let sections = app_actions(&arc, ListContext::Plain);
    assert_eq!(
        titles(&sections),
        vec![vec!["Open App", "Show in Finder"], vec!["Update via Homebrew"]]
    );
}

#[test]
fn update_panel_lists_every_applicable_source() {
    let sections = update_actions(&app("onepassword"));
    assert_eq!(
        titles(&sections),
        vec![
            vec!["Update via Homebrew", "Open in App Store"],
            vec!["Open App", "Show in Finder", "Open in Vesslo"],
        ]
    );
    assert_eq!(
        sections[0].actions[1].action,
        AppAction::OpenInAppStore {
            url: "macappstore://apps.apple.com/app/id1333542190".into()
        }
    );

    let sections = update_actions(&app("obsidian"));
    assert_eq!(
        sections[0].actions[0].action,
        AppAction::UpdateInVesslo {
            bundle_id: "md.obsidian".into()
        }
    );
}

#[test]
fn manual_update_falls_back_to_vesslo() {
    let sections = update_actions(&app("legacy"));
    assert_eq!(sections[0].title.as_deref(), Some("Update"));
    assert_eq!(
        sections[0].actions[0].action,
        AppAction::OpenInVesslo {
            bundle_id: "com.example.legacy".into()
        }
    );
}

#[test]
fn bulk_panel_offers_single_and_all() {
    let sections = bulk_actions(&app("iterm"));
    assert_eq!(titles(&sections), vec![vec!["Update", "Update All"]]);
    assert_eq!(sections[0].actions[1].action, AppAction::UpdateAllHomebrew);
}

#[test]
fn app_row_lists_reasons_badges_and_sources() {
    let arc = app("arc");
    let row = app_row(
        &arc,
        &[MatchedField::Developer, MatchedField::Memo, MatchedField::Tag],
    );

    assert_eq!(row.title, "Arc");
    assert_eq!(row.subtitle, "1.2 • The Browser Company • #browser • #daily");
    assert_eq!(row.icon.as_deref(), Some("data:image/png;base64,iVBORw0KGgo="));

    let tooltips: Vec<&str> = row
        .accessories
        .iter()
        .filter_map(|accessory| match accessory {
            Accessory::Icon { tooltip, .. } => Some(tooltip.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(
        tooltips,
        vec!["Matched: Developer", "Matched: Memo", "Matched: Tag"]
    );
    assert_eq!(
        row.accessories[3..],
        [
            Accessory::Tag {
                value: "UPDATE".into(),
                tint: Tint::Green
            },
            Accessory::Tag {
                value: "Brew".into(),
                tint: Tint::Orange
            },
        ]
    );
}

#[test]
fn app_row_drops_empty_subtitle_parts() {
    let row = app_row(&app("legacy"), &[]);
    assert_eq!(row.subtitle, "2.0");
    assert!(row.icon.is_none());

    let row = app_row(&app("slack"), &[]);
    assert_eq!(row.subtitle, "4.0 • Slack Technologies • #work • #chat • #daily");
    assert_eq!(
        row.accessories,
        vec![Accessory::Tag {
            value: "App Store".into(),
            tint: Tint::Blue
        }]
    );
}

#[test]
fn update_row_badge_follows_source_precedence() {
    let row = update_row(&app("onepassword"));
    assert_eq!(row.subtitle, "AgileBits Inc.");
    assert_eq!(
        row.accessories,
        vec![
            Accessory::Text {
                text: "8.1 → 8.2".into()
            },
            Accessory::Tag {
                value: "brew".into(),
                tint: Tint::Orange
            },
        ]
    );

    let badge = |id: &str| match &update_row(&app(id)).accessories[1] {
        Accessory::Tag { value, .. } => value.clone(),
        other => panic!("unexpected accessory {other:?}"),
    };
    assert_eq!(badge("xcode"), "appStore");
    assert_eq!(badge("obsidian"), "sparkle");
    assert_eq!(badge("iterm"), "brew");
    assert_eq!(badge("legacy"), "manual");
    assert_eq!(update_row(&app("legacy")).subtitle, "");
}

#[test]
fn header_and_tag_rows() {
    let header = bulk_header_row(3);
    assert_eq!(header.id, "update-all-homebrew");
    assert_eq!(header.title, "Update All Homebrew Apps");
    assert_eq!(header.subtitle, "3 apps");

    let apps = support::fixture_apps();
    let groups = tag_groups(&apps);
    let row = tag_row(&groups[0]);
    assert_eq!(row.title, "#daily");
    assert_eq!(row.accessories, vec![Accessory::Text { text: "3 apps".into() }]);
}

#[test]
fn actions_serialize_with_type_tag() {
    let encoded = serde_json::to_value(AppAction::UpdateViaHomebrew {
        cask: "arc".into(),
        app_name: "Arc".into(),
    })
    .unwrap();
    assert_eq!(
        encoded,
        serde_json::json!({"type": "update_via_homebrew", "cask": "arc", "app_name": "Arc"})
    );

    let decoded: AppAction = serde_json::from_str(r#"{"type":"back_to_tags"}"#).unwrap();
    assert_eq!(decoded, AppAction::BackToTags);
}

#[test]
fn unknown_sources_keep_raw_spelling_with_neutral_tint() {
    let mut legacy = app("legacy");
    legacy.sources = vec!["Setapp".into(), "Sparkle".into()];
    let row = app_row(&legacy, &[]);

    assert_eq!(
        row.accessories[1..],
        [
            Accessory::Tag {
                value: "Setapp".into(),
                tint: Tint::Secondary
            },
            Accessory::Tag {
                value: "Sparkle".into(),
                tint: Tint::Green
            },
        ]
    );
}
