use locator_synth::{
    generate_locators, select, AppContext, FilterConfig, LocatorRequest, LocatorResult,
    LocatorStrategy, PlatformKind, Tree,
};
use pretty_assertions::assert_eq;

const ANDROID_LOGIN: &str = include_str!("fixtures/android_login.xml");
const IOS_SETTINGS: &str = include_str!("fixtures/ios_settings.xml");

fn paths(results: &[LocatorResult]) -> Vec<&str> {
    results.iter().map(|r| r.element.path.as_str()).collect()
}

fn keys(result: &LocatorResult) -> Vec<&'static str> {
    result.locators.keys().map(|key| key.name()).collect()
}

fn find<'a>(results: &'a [LocatorResult], path: &str) -> &'a LocatorResult {
    results
        .iter()
        .find(|r| r.element.path == path)
        .unwrap_or_else(|| panic!("no result for path {path:?}"))
}

#[test]
fn single_button_gets_its_id() {
    let snapshot = r#"<hierarchy><Button id="btn1" clickable="true"/></hierarchy>"#;
    let results = generate_locators(snapshot, &LocatorRequest::default());

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].locator(LocatorStrategy::Id), Some("btn1"));
    assert_eq!(results[0].element.tag_name, "Button");
    assert!(results[0].element.clickable);
}

#[test]
fn duplicate_ids_fall_back_to_indexed_paths() {
    let snapshot = r#"<hierarchy><Button id="x"/><Button id="x"/></hierarchy>"#;
    let results = generate_locators(snapshot, &LocatorRequest::default());

    assert_eq!(results.len(), 2);
    for result in &results {
        assert_eq!(result.locator(LocatorStrategy::Id), None);
    }
    assert_eq!(
        results[0].locator(LocatorStrategy::XPath),
        Some(r#"(//Button[@id="x"])[1]"#)
    );
    assert_eq!(
        results[1].locator(LocatorStrategy::XPath),
        Some(r#"(//Button[@id="x"])[2]"#)
    );
}

#[test]
fn empty_snapshot_yields_no_results() {
    for platform in [PlatformKind::Ios, PlatformKind::Android, PlatformKind::Other] {
        assert!(generate_locators("", &LocatorRequest::new(platform)).is_empty());
    }
}

#[test]
fn fetchable_only_keeps_interactable_nodes() {
    let snapshot = r#"<hierarchy><Button clickable="true"/><LinearLayout/></hierarchy>"#;
    let request = LocatorRequest::new(PlatformKind::Android)
        .with_filters(FilterConfig::default().with_fetchable_only(true));
    let results = generate_locators(snapshot, &request);

    assert_eq!(paths(&results), vec!["0"]);
    assert_eq!(results[0].element.tag_name, "Button");
}

#[test]
fn android_login_screen() {
    let request = LocatorRequest::new(PlatformKind::Android);
    let results = generate_locators(ANDROID_LOGIN, &request);

    assert_eq!(
        paths(&results),
        vec!["0", "1", "1.0", "1.0.0", "1.0.1", "1.0.2", "1.0.3", "1.0.4"]
    );

    let login = find(&results, "1.0.2");
    assert_eq!(
        keys(login),
        vec![
            "id",
            "accessibility id",
            "xpath",
            "-android uiautomator",
            "class name"
        ]
    );
    assert_eq!(
        login.locator(LocatorStrategy::Id),
        Some("com.example.app:id/login")
    );
    assert_eq!(
        login.locator(LocatorStrategy::AccessibilityId),
        Some("sign_in")
    );
    assert_eq!(
        login.locator(LocatorStrategy::XPath),
        Some(r#"//android.widget.Button[@content-desc="sign_in"]"#)
    );
    assert_eq!(
        login.locator(LocatorStrategy::UiAutomator),
        Some(r#"new UiSelector().resourceId("com.example.app:id/login")"#)
    );
    assert_eq!(login.element.text, "Sign in");
    assert_eq!(login.element.content_description, "sign_in");

    // outside the active window: no UiSelector
    let status_bar = find(&results, "0");
    assert_eq!(keys(status_bar), vec!["id", "xpath"]);

    let version = find(&results, "1.0.4");
    assert_eq!(keys(version), vec!["xpath", "-android uiautomator"]);
    assert_eq!(
        version.locator(LocatorStrategy::UiAutomator),
        Some(r#"new UiSelector().text("v1.0")"#)
    );
}

#[test]
fn clickable_only_keeps_clickable_nodes() {
    let request = LocatorRequest::new(PlatformKind::Android)
        .with_filters(FilterConfig::default().with_clickable_only(true));
    let results = generate_locators(ANDROID_LOGIN, &request);

    assert_eq!(paths(&results), vec!["1.0.0", "1.0.1", "1.0.2", "1.0.3"]);
    assert!(results.iter().all(|r| r.element.clickable));
}

#[test]
fn filtered_parent_does_not_hide_children() {
    let request = LocatorRequest::new(PlatformKind::Android).with_filters(
        FilterConfig::default()
            .exclude_tag("android.widget.FrameLayout")
            .exclude_tag("android.widget.LinearLayout"),
    );
    let results = generate_locators(ANDROID_LOGIN, &request);
    assert_eq!(
        paths(&results),
        vec!["1.0.0", "1.0.1", "1.0.2", "1.0.3", "1.0.4"]
    );
}

#[test]
fn ios_settings_screen() {
    let request = LocatorRequest::new(PlatformKind::Ios);
    let results = generate_locators(IOS_SETTINGS, &request);
    assert_eq!(results.len(), 9);

    let done = find(&results, "0.0.1.3");
    assert_eq!(
        keys(done),
        vec![
            "id",
            "accessibility id",
            "-ios predicate string",
            "-ios class chain",
            "xpath",
            "class name"
        ]
    );
    assert_eq!(done.locator(LocatorStrategy::Id), Some("done-button"));
    assert_eq!(done.locator(LocatorStrategy::AccessibilityId), Some("Done"));
    assert_eq!(
        done.locator(LocatorStrategy::PredicateString),
        Some(r#"name == "Done""#)
    );
    assert_eq!(
        done.locator(LocatorStrategy::ClassChain),
        Some(r#"**/XCUIElementTypeButton[`name == "Done"`]"#)
    );
    assert_eq!(
        done.locator(LocatorStrategy::ClassName),
        Some("XCUIElementTypeButton")
    );

    // "Settings" is shared by three nodes, so the predicate needs every clause
    let title = find(&results, "0.0.0.0");
    assert_eq!(title.locator(LocatorStrategy::AccessibilityId), None);
    assert_eq!(
        title.locator(LocatorStrategy::PredicateString),
        Some(r#"name == "Settings" AND label == "Settings" AND value == "Settings""#)
    );

    let window = find(&results, "0.0");
    assert_eq!(
        window.locator(LocatorStrategy::ClassChain),
        Some("**/XCUIElementTypeWindow")
    );
    assert_eq!(
        window.locator(LocatorStrategy::XPath),
        Some("//XCUIElementTypeWindow")
    );

    let application = find(&results, "0");
    assert_eq!(application.locator(LocatorStrategy::ClassChain), None);
}

#[test]
fn ios_web_context_has_no_native_strategies() {
    let request = LocatorRequest::new(PlatformKind::Ios).with_context(AppContext::Web);
    let results = generate_locators(IOS_SETTINGS, &request);
    let done = find(&results, "0.0.1.3");
    assert_eq!(keys(done), vec!["id", "xpath", "class name"]);
}

#[test]
fn xpath_locators_select_exactly_their_node() {
    for (snapshot, platform) in [
        (ANDROID_LOGIN, PlatformKind::Android),
        (IOS_SETTINGS, PlatformKind::Ios),
    ] {
        let tree = Tree::parse(snapshot);
        let results = generate_locators(snapshot, &LocatorRequest::new(platform));
        assert!(!results.is_empty());
        for result in &results {
            let expression = result
                .locator(LocatorStrategy::XPath)
                .expect("every element has a path query");
            let expected = tree.find_by_path(&result.element.path).unwrap();
            assert_eq!(
                select(&tree, expression).unwrap(),
                vec![expected],
                "{expression} for {}",
                result.element.path
            );
        }
    }
}

#[test]
fn output_is_idempotent() {
    let request = LocatorRequest::new(PlatformKind::Ios);
    let first = serde_json::to_string(&generate_locators(IOS_SETTINGS, &request)).unwrap();
    let second = serde_json::to_string(&generate_locators(IOS_SETTINGS, &request)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn serialized_locators_keep_priority_order() {
    let request = LocatorRequest::new(PlatformKind::Ios);
    let results = generate_locators(IOS_SETTINGS, &request);
    let done = find(&results, "0.0.1.3");

    let value = serde_json::to_value(done).unwrap();
    assert_eq!(value["tagName"], "XCUIElementTypeButton");
    assert_eq!(value["path"], "0.0.1.3");
    assert_eq!(value["displayed"], true);
    assert!(value["locators"]["-ios class chain"].is_string());

    // `Value` maps are sorted, so check the order on the raw string
    let json = serde_json::to_string(&done.locators).unwrap();
    let id = json.find("\"id\"").unwrap();
    let accessibility = json.find("\"accessibility id\"").unwrap();
    let class_name = json.find("\"class name\"").unwrap();
    assert!(id < accessibility && accessibility < class_name, "{json}");
}

#[test]
fn parallel_matches_sequential() {
    for (snapshot, platform) in [
        (ANDROID_LOGIN, PlatformKind::Android),
        (IOS_SETTINGS, PlatformKind::Ios),
    ] {
        let sequential = LocatorRequest::new(platform);
        let parallel = sequential.clone().with_parallel(true);
        let a = generate_locators(snapshot, &sequential);
        let b = generate_locators(snapshot, &parallel);
        assert_eq!(paths(&a), paths(&b));
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
