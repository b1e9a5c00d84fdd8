//! End-to-end tests of the presentation model: filtering, expansion, hover
//! and theme, driven through RootComposer the way the browse session does.

use std::sync::Arc;

use rstest::{fixture, rstest};

use roadmap::application::presenter::Glyph;
use roadmap::application::{filter_forest, RootComposer, UiEvent};
use roadmap::domain::{ContentKind, Forest, NodePath, Theme, TreeNode};
use roadmap::util::testing;

// ============================================================
// Fixtures
// ============================================================

#[fixture]
fn forest() -> Forest {
    Forest::from(vec![
        TreeNode::leaf("src").with_definitions(["parseTree"]),
        TreeNode::leaf("docs"),
        TreeNode::leaf("api")
            .with_endpoints(["/a", "/b"])
            .with_children([TreeNode::leaf("v1")
                .with_definitions(["handler"])
                .with_children([TreeNode::leaf("routes.js").with_endpoints(["/users"])])]),
        TreeNode::leaf("utils"),
    ])
}

fn composer_with(forest: Forest) -> RootComposer {
    testing::init_test_setup();
    let mut composer = RootComposer::new(Theme::Light);
    composer.replace_forest(forest);
    composer
}

fn path(text: &str) -> NodePath {
    text.parse().unwrap()
}

fn names(forest: &Forest) -> Vec<String> {
    forest.iter().map(|n| n.name.clone()).collect()
}

// ============================================================
// Search
// ============================================================

#[rstest]
fn given_definition_match_when_filtering_then_only_that_root_kept(forest: Forest) {
    let filtered = filter_forest("parse", &forest);
    assert_eq!(names(&filtered), vec!["src"]);
}

#[rstest]
#[case("PARSETREE", vec!["src"])]
#[case("s", vec!["src", "docs", "utils"])]
#[case("handler", vec![])]
#[case("/a", vec![])]
fn given_query_when_filtering_then_only_roots_are_searched(
    forest: Forest,
    #[case] query: &str,
    #[case] expected: Vec<&str>,
) {
    assert_eq!(names(&filter_forest(query, &forest)), expected);
}

#[rstest]
fn given_query_cleared_when_recomputing_then_original_forest_restored(forest: Forest) {
    let mut composer = composer_with(forest.clone());

    composer.set_query("x");
    assert!(composer.filtered().is_empty());

    composer.set_query("");
    assert!(composer.filtered().ptr_eq(&forest));
    assert_eq!(names(composer.filtered()), names(&forest));
}

#[rstest]
fn given_any_query_when_filtering_then_result_is_ordered_subset(forest: Forest) {
    for query in ["a", "i", "s", "zz", "T"] {
        let filtered = filter_forest(query, &forest);
        let mut remaining = forest.iter();
        for kept in filtered.iter() {
            assert!(
                remaining.any(|n| Arc::ptr_eq(n, kept)),
                "{query}: {} out of order or foreign",
                kept.name
            );
        }
    }
}

// ============================================================
// Expansion
// ============================================================

#[rstest]
fn given_leaf_root_when_toggled_then_flag_flips_but_nothing_revealed(forest: Forest) {
    let mut composer = composer_with(forest);

    assert!(composer.toggle(&path("utils")).unwrap());

    let frame = composer.render();
    let utils = frame.items.iter().find(|i| i.label == "utils").unwrap();
    assert!(utils.expanded);
    assert!(utils.glyph.is_none());
    assert!(utils.content.is_none());
}

#[rstest]
fn given_expanded_api_when_rendering_then_endpoints_and_child_shown(forest: Forest) {
    let mut composer = composer_with(forest);
    composer.toggle(&path("api")).unwrap();

    let frame = composer.render();
    let api = frame.items.iter().find(|i| i.label == "api").unwrap();
    assert_eq!(api.glyph, Some(Glyph::Expanded));
    let content = api.content.as_ref().unwrap();
    let endpoints = content.endpoints.as_ref().unwrap();
    assert_eq!(endpoints.heading(), "Endpoints");
    let labels: Vec<_> = endpoints.rows.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec!["/a", "/b"]);
    assert!(content.definitions.is_none());
    assert_eq!(content.children.len(), 1);
    assert_eq!(content.children[0].label, "v1");
    assert_eq!(content.children[0].glyph, Some(Glyph::Collapsed));
}

#[rstest]
fn given_expanded_child_when_parent_collapses_and_reopens_then_child_state_kept(forest: Forest) {
    let mut composer = composer_with(forest);
    composer.expand_path(&path("api > v1")).unwrap();

    composer.toggle(&path("api")).unwrap();
    let frame = composer.render();
    let api = frame.items.iter().find(|i| i.label == "api").unwrap();
    assert!(api.content.is_none());

    composer.toggle(&path("api")).unwrap();
    let frame = composer.render();
    let api = frame.items.iter().find(|i| i.label == "api").unwrap();
    let v1 = &api.content.as_ref().unwrap().children[0];
    assert!(v1.expanded);
    assert_eq!(v1.content.as_ref().unwrap().children[0].label, "routes.js");
}

#[rstest]
fn given_expanded_root_when_query_hides_and_shows_it_then_state_reset(forest: Forest) {
    let mut composer = composer_with(forest);
    composer.toggle(&path("api")).unwrap();

    composer.set_query("parse");
    assert_eq!(composer.presenters().len(), 1);
    composer.set_query("");

    let api = composer
        .presenters()
        .iter()
        .find(|p| p.node().name == "api")
        .unwrap();
    assert!(!api.is_expanded());
}

#[rstest]
fn given_expanded_root_when_query_keeps_it_then_state_kept(forest: Forest) {
    let mut composer = composer_with(forest);
    composer.toggle(&path("src")).unwrap();

    composer.set_query("parse");
    composer.set_query("");

    assert!(composer.presenters()[0].is_expanded());
}

#[rstest]
fn given_expanded_root_when_forest_replaced_then_state_reset(forest: Forest) {
    let mut composer = composer_with(forest);
    composer.toggle(&path("docs")).unwrap();

    composer.replace_forest(Forest::from(vec![TreeNode::leaf("docs")]));

    assert!(!composer.presenters()[0].is_expanded());
}

#[rstest]
fn given_unknown_path_when_toggling_then_error_and_state_unchanged(forest: Forest) {
    let mut composer = composer_with(forest);
    assert!(composer.toggle(&path("api > v2")).is_err());
    assert!(composer.presenters().iter().all(|p| !p.is_expanded()));
}

#[rstest]
fn given_expand_all_when_rendering_then_every_node_visible(forest: Forest) {
    let mut composer = composer_with(forest);
    composer.expand_all();

    let visible: usize = composer
        .render()
        .items
        .iter()
        .map(|item| item.visible_count())
        .sum();
    assert_eq!(visible, 6);
}

// ============================================================
// Hover
// ============================================================

#[rstest]
fn given_hovered_endpoint_when_leaving_then_tooltip_hidden_but_row_remembered(forest: Forest) {
    let mut composer = composer_with(forest);
    let api = path("api");
    composer.toggle(&api).unwrap();

    composer.hover_enter(&api, ContentKind::Endpoint, "/b").unwrap();
    let frame = composer.render();
    let item = frame.items.iter().find(|i| i.label == "api").unwrap();
    assert_eq!(item.tooltip.as_deref(), Some("/b"));
    let rows = &item.content.as_ref().unwrap().endpoints.as_ref().unwrap().rows;
    assert!(!rows[0].hovered);
    assert!(rows[1].hovered);

    composer.hover_leave(&api).unwrap();
    let presenter = composer
        .presenters()
        .iter()
        .find(|p| p.node().name == "api")
        .unwrap();
    assert!(!presenter.hover().visible);
    assert_eq!(
        presenter.hover().row,
        Some((ContentKind::Endpoint, "/b".to_string()))
    );
    assert!(presenter.hover().tooltip().is_none());
}

#[rstest]
fn given_missing_row_when_hovering_then_unknown_node_error(forest: Forest) {
    let mut composer = composer_with(forest);
    assert!(composer
        .hover_enter(&path("api"), ContentKind::Definition, "/a")
        .is_err());
}

// ============================================================
// Theme and batching
// ============================================================

#[rstest]
fn given_theme_toggled_twice_then_back_to_light_and_nothing_else_changed(forest: Forest) {
    let mut composer = composer_with(forest.clone());
    composer.set_query("api");
    composer.toggle(&path("api")).unwrap();

    assert_eq!(composer.toggle_theme(), Theme::Dark);
    assert_eq!(composer.toggle_theme(), Theme::Light);

    assert_eq!(composer.query(), "api");
    assert!(composer.forest().ptr_eq(&forest));
    assert!(composer.presenters()[0].is_expanded());
}

#[rstest]
fn given_batch_with_query_and_toggle_when_applied_then_toggle_sees_filtered_roots(
    forest: Forest,
) {
    let mut composer = composer_with(forest);

    let errors = composer.apply([
        UiEvent::SetQuery("parse".into()),
        UiEvent::Toggle(path("api")),
        UiEvent::Toggle(path("src")),
    ]);

    assert_eq!(errors.len(), 1);
    assert_eq!(names(composer.filtered()), vec!["src"]);
    assert!(composer.presenters()[0].is_expanded());
}
