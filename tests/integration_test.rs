use std::collections::HashSet;

use treeseek::{
    collapse, compute_visible, expand, search, Catalog, Collapsed, ExpansionState, Field,
    Hierarchy, Item, ItemKey, ItemStore, SearchItem, SearcherError, Session,
};

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// Menu-like tree used across tests.
///
/// ```text
/// Window
///   Layouts
///     Default
///     Save
///   General
/// Edit
///   Preferences
/// Assets
///   Create
///     Folder
///     Material
/// ```
fn menu() -> ItemStore {
    ItemStore::build(vec![
        SearchItem::new("Window").children_from([
            SearchItem::new("Layouts").children_from([
                SearchItem::new("Default"),
                SearchItem::new("Save"),
            ]),
            SearchItem::new("General"),
        ]),
        SearchItem::new("Edit").children_from([SearchItem::new("Preferences")]),
        SearchItem::new("Assets").children_from([SearchItem::new("Create").children_from([
            SearchItem::new("Folder"),
            SearchItem::new("Material"),
        ])]),
    ])
}

/// `count` flat items; every other one contains the token "alpha".
fn synthetic(count: usize) -> ItemStore {
    let roots = (0..count)
        .map(|i| {
            let name = if i % 2 == 0 {
                format!("alpha{} group{}", i, i % 7)
            } else {
                format!("beta{} group{}", i, i % 7)
            };
            SearchItem::new(name)
        })
        .collect();
    ItemStore::build(roots)
}

fn names(items: &[&Item]) -> Vec<String> {
    items.iter().map(|i| i.name().to_owned()).collect()
}

fn key_names<H: Hierarchy>(tree: &H, keys: &[ItemKey]) -> Vec<String> {
    keys.iter()
        .map(|&k| tree.item(k).unwrap().name().to_owned())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn flat_window_layouts_scenario() {
    let store = ItemStore::build(vec![
        SearchItem::new("Window Layouts Default"),
        SearchItem::new("Window Layouts Save"),
        SearchItem::new("Edit Preferences"),
    ]);

    let results = search().store(&store).query("win lay").run().unwrap();

    assert_eq!(
        names(&results.items),
        vec!["Window Layouts Default", "Window Layouts Save"]
    );
    assert!(results.max_score > 0.0);
}

#[test]
fn query_is_trimmed() {
    let store = menu();
    let padded = search().store(&store).query(" \tedit  ").run().unwrap();
    let plain = search().store(&store).query("edit").run().unwrap();
    assert_eq!(names(&padded.items), names(&plain.items));
    assert_eq!(padded.max_score, plain.max_score);
}

#[test]
fn empty_query_returns_whole_store() {
    let store = menu();
    let results = search().store(&store).query("").run().unwrap();
    assert_eq!(results.items.len(), store.len());
    assert_eq!(results.max_score, 0.0);
}

#[test]
fn no_match_is_empty_not_error() {
    let store = menu();
    let results = search().store(&store).query("zzz").run().unwrap();
    assert!(results.is_empty());
    assert_eq!(results.max_score, 0.0);
    assert!(results.best().is_none());
}

#[test]
fn best_match_comes_first() {
    let store = menu();
    let results = search().store(&store).query("edit").run().unwrap();
    assert_eq!(results.best().unwrap().path(), "Edit");
    assert_eq!(results.items.len(), 2);
}

#[test]
fn filter_combines_with_path_match() {
    let mut folder = SearchItem::new("Folder");
    folder.add_field(Field::new("kind", "command")).unwrap();
    let store = ItemStore::build(vec![
        SearchItem::new("Assets").children_from([folder, SearchItem::new("Folder Icon")])
    ]);

    let results = search()
        .store(&store)
        .query("ass fol")
        .filter(|_: &str, item: &Item| item.field("kind") == Some("command"))
        .run()
        .unwrap();
    assert_eq!(names(&results.items), vec!["Folder"]);

    // With an empty query the filter alone decides.
    let results = search()
        .store(&store)
        .filter(|_: &str, item: &Item| item.field("kind") == Some("command"))
        .run()
        .unwrap();
    assert_eq!(names(&results.items), vec!["Folder"]);
}

#[test]
fn builder_rejects_bad_config() {
    assert_eq!(search().query("x").run().unwrap_err(), SearcherError::NoStore);

    let first = ItemStore::build(vec![SearchItem::new("Edit")]);
    let second = ItemStore::build(vec![SearchItem::new("Editor")]);
    let err = search().store(&first).store(&second).query("edit").run().unwrap_err();
    assert_eq!(err, SearcherError::DuplicateStore(0));

    let store = menu();
    let err = search().store(&store).threads(0).run().unwrap_err();
    assert_eq!(err, SearcherError::InvalidThreadCount(0));
    assert!(err.is_validation());
}

#[test]
fn parallel_and_serial_agree() {
    let store = synthetic(500);

    let serial = search()
        .store(&store)
        .query("alpha")
        .parallel(false)
        .run()
        .unwrap();
    let parallel = search()
        .store(&store)
        .query("alpha")
        .threads(4)
        .parallel_threshold(100)
        .run()
        .unwrap();

    assert_eq!(serial.items.len(), 250);
    assert_eq!(serial.max_score, parallel.max_score);
    assert_eq!(serial.best().unwrap().id(), parallel.best().unwrap().id());

    let serial_ids: HashSet<_> = serial.items.iter().map(|i| i.id()).collect();
    let parallel_ids: HashSet<_> = parallel.items.iter().map(|i| i.id()).collect();
    assert_eq!(serial_ids, parallel_ids);

    assert_eq!(serial.stats.workers, 1);
    assert_eq!(parallel.stats.workers, 4);
}

#[test]
fn parallel_results_are_reproducible() {
    let store = synthetic(1000);
    let run = || {
        search()
            .store(&store)
            .query("beta gr")
            .threads(8)
            .run()
            .unwrap()
            .items
            .iter()
            .map(|i| i.id())
            .collect::<Vec<_>>()
    };
    let first = run();
    for _ in 0..5 {
        assert_eq!(run(), first);
    }
}

#[test]
fn parallel_filter_concatenates_slices_in_order() {
    let store = synthetic(300);
    let results = search()
        .store(&store)
        .threads(3)
        .filter(|_: &str, item: &Item| item.id() % 5 == 0)
        .run()
        .unwrap();

    let ids: Vec<_> = results.items.iter().map(|i| i.id()).collect();
    let expected: Vec<_> = (0..300).filter(|i| i % 5 == 0).collect();
    assert_eq!(ids, expected);
    assert_eq!(results.stats.workers, 3);
}

#[test]
fn catalog_search_keeps_overall_best_first() {
    let mut catalog = Catalog::new();
    catalog.add_store(vec![SearchItem::new("Material Editor")]);
    catalog.add_store(vec![SearchItem::new("Material")]);

    let results = search().catalog(&catalog).query("mat").run().unwrap();
    assert_eq!(names(&results.items), vec!["Material", "Material Editor"]);
    assert_eq!(results.best().unwrap().store_id(), 1);
}

#[test]
fn visible_results_include_ancestors() {
    let store = menu();
    let results = search().store(&store).query("mat").run().unwrap();
    let matches: Vec<_> = results.items.iter().map(|i| i.key()).collect();

    let mut expansion = ExpansionState::new();
    let visible = compute_visible(&store, "mat", &matches, &mut expansion, None).unwrap();
    assert_eq!(key_names(&store, &visible), vec!["Assets", "Create", "Material"]);
}

#[test]
fn expand_then_collapse_restores_visible_set() {
    let store = menu();
    let results = search().store(&store).query("lay").run().unwrap();
    let matches: Vec<_> = results.items.iter().map(|i| i.key()).collect();
    let layouts = store.get(1).unwrap().key();

    let mut expansion = ExpansionState::new();
    compute_visible(&store, "lay", &matches, &mut expansion, None).unwrap();
    let before = match collapse(&store, layouts, &matches, &mut expansion, None).unwrap() {
        Collapsed::Refreshed(visible) => visible,
        other => panic!("expected a refresh, got {:?}", other),
    };

    expand(&store, layouts, &matches, &mut expansion, None).unwrap();
    let after = match collapse(&store, layouts, &matches, &mut expansion, None).unwrap() {
        Collapsed::Refreshed(visible) => visible,
        other => panic!("expected a refresh, got {:?}", other),
    };
    assert_eq!(before, after);
}

#[test]
fn session_walks_the_state_machine() {
    let mut catalog = Catalog::new();
    catalog.add_store(vec![SearchItem::new("Window").children_from([
        SearchItem::new("Layouts").children_from([
            SearchItem::new("Default"),
            SearchItem::new("Save"),
        ]),
    ])]);

    let mut session = Session::new(&catalog);

    session.set_query("", 0).unwrap();
    let roots: Vec<_> = session.visible_items().unwrap().iter().map(|i| i.name()).collect();
    assert_eq!(roots, vec!["Window"]);

    session.set_query("sa", 2).unwrap();
    let shown: Vec<_> = session.visible_items().unwrap().iter().map(|i| i.name()).collect();
    assert_eq!(shown, vec!["Window", "Layouts", "Save"]);
    assert_eq!(session.selected_item().unwrap().unwrap().name(), "Save");
    assert_eq!(session.suggestion(), Some("save"));

    let layouts = ItemKey { store: 0, id: 1 };
    session.collapse(layouts).unwrap();
    let shown: Vec<_> = session.visible_items().unwrap().iter().map(|i| i.name()).collect();
    assert_eq!(shown, vec!["Window", "Layouts"]);

    session.set_query("", 0).unwrap();
    assert!(session.view().expansion().is_empty());
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

use proptest::prelude::*;
use treeseek::match_path;

/// Build a store from `(name, link)` pairs: item `i` is a root when `i == 0`
/// or `link % 3 == 0`, otherwise a child of item `link % i`.
fn random_tree(layout: &[(String, usize)]) -> ItemStore {
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); layout.len()];
    let mut roots = Vec::new();
    for (i, (_, link)) in layout.iter().enumerate() {
        if i == 0 || link % 3 == 0 {
            roots.push(i);
        } else {
            children[link % i].push(i);
        }
    }

    fn make(i: usize, layout: &[(String, usize)], children: &[Vec<usize>]) -> SearchItem {
        SearchItem::new(layout[i].0.clone())
            .children_from(children[i].iter().map(|&c| make(c, layout, children)))
    }

    ItemStore::build(roots.into_iter().map(|i| make(i, layout, &children)).collect())
}

fn tree_layout() -> impl Strategy<Value = Vec<(String, usize)>> {
    prop::collection::vec(("[a-d]{1,4}", 0usize..64), 1..60)
}

fn query() -> impl Strategy<Value = String> {
    "[a-d]{1,2}( [a-d]{1,2})?"
}

fn match_keys(store: &ItemStore, q: &str) -> Vec<ItemKey> {
    search()
        .store(store)
        .query(q)
        .parallel(false)
        .run()
        .unwrap()
        .items
        .iter()
        .map(|i| i.key())
        .collect()
}

proptest! {
    #[test]
    fn paths_extend_parent_paths(layout in tree_layout()) {
        let store = random_tree(&layout);
        prop_assert_eq!(store.len(), layout.len());

        for (index, item) in store.items().iter().enumerate() {
            prop_assert_eq!(item.id(), index);
            match item.parent_key() {
                None => {
                    prop_assert_eq!(item.path(), item.name());
                    prop_assert_eq!(item.depth(), 0);
                }
                Some(parent) => {
                    let parent = store.get(parent.id).unwrap();
                    prop_assert!(parent.id() < item.id());
                    prop_assert_eq!(item.path(), format!("{} {}", parent.path(), item.name()));
                    prop_assert_eq!(item.depth(), parent.depth() + 1);
                }
            }
        }
    }

    #[test]
    fn matching_ignores_ascii_case(q in query(), path in "[a-d]{1,4}( [a-d]{1,4}){0,3}") {
        prop_assert_eq!(match_path(&q.to_ascii_uppercase(), &path), match_path(&q, &path));
        prop_assert_eq!(match_path(&q, &path.to_ascii_uppercase()), match_path(&q, &path));
    }

    #[test]
    fn parallel_scan_matches_serial_scan(layout in tree_layout(), q in query()) {
        let store = random_tree(&layout);
        let serial = search().store(&store).query(&q).parallel(false).run().unwrap();
        let parallel = search()
            .store(&store)
            .query(&q)
            .threads(3)
            .parallel_threshold(0)
            .run()
            .unwrap();

        let serial_ids: HashSet<_> = serial.items.iter().map(|i| i.id()).collect();
        let parallel_ids: HashSet<_> = parallel.items.iter().map(|i| i.id()).collect();
        prop_assert_eq!(serial_ids, parallel_ids);
        prop_assert_eq!(serial.max_score, parallel.max_score);
        prop_assert_eq!(serial.best().map(|i| i.id()), parallel.best().map(|i| i.id()));
    }

    #[test]
    fn visible_list_is_ancestor_closed(layout in tree_layout(), q in query()) {
        let store = random_tree(&layout);
        let matches = match_keys(&store, &q);
        let mut expansion = ExpansionState::new();
        let visible = compute_visible(&store, &q, &matches, &mut expansion, None).unwrap();

        let shown: HashSet<_> = visible.iter().copied().collect();
        prop_assert_eq!(shown.len(), visible.len());
        for key in &matches {
            prop_assert!(shown.contains(key));
        }
        for &key in &visible {
            if let Some(parent) = store.get(key.id).unwrap().parent_key() {
                prop_assert!(shown.contains(&parent));
            }
        }
    }

    #[test]
    fn empty_query_lists_only_roots(layout in tree_layout()) {
        let store = random_tree(&layout);
        let matches = match_keys(&store, "");
        let mut expansion = ExpansionState::new();
        let visible = compute_visible(&store, "", &matches, &mut expansion, None).unwrap();

        let roots: Vec<_> = store.roots().map(|i| i.key()).collect();
        prop_assert_eq!(visible, roots);
        prop_assert!(expansion.is_empty());
    }

    #[test]
    fn collapse_then_expand_restores_view(layout in tree_layout(), q in query()) {
        let store = random_tree(&layout);
        let matches = match_keys(&store, &q);
        let mut expansion = ExpansionState::new();
        let visible = compute_visible(&store, &q, &matches, &mut expansion, None).unwrap();

        let branch = visible
            .iter()
            .copied()
            .find(|&key| store.get(key.id).unwrap().has_children());
        if let Some(branch) = branch {
            let collapsed = collapse(&store, branch, &matches, &mut expansion, None).unwrap();
            prop_assert!(matches!(collapsed, Collapsed::Refreshed(_)));
            let restored = expand(&store, branch, &matches, &mut expansion, None).unwrap();
            prop_assert_eq!(restored, visible);
        }
    }
}
