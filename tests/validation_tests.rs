use bytes::Bytes;
use serde_json::json;

use toolsubmit::models::{Pricing, UploadedFile};
use toolsubmit::validation::schemas::{FORGOT_PASSWORD, TOOL_SUBMISSION};
use toolsubmit::validation::{FieldErrors, PathSegment, RawValue, Schema, ValidationIssue};

const MB: u64 = 1024 * 1024;

fn valid_input() -> RawValue {
    let mut input = RawValue::from(json!({
        "name": "  Acme Writer ",
        "website": "https://example.com",
        "tagline": "Write faster with AI",
        "description": "A writing assistant for busy people.",
        "categories": [" AI ", "Writing", "Productivity"],
        "pricing": "Freemium",
    }));
    input.insert("homepageScreenshot", image("home.png", "image/png", MB));
    input
}

fn image(name: &str, content_type: &str, size: u64) -> UploadedFile {
    UploadedFile::described(Some(name.to_string()), content_type.to_string(), size)
}

fn field_errors(input: &RawValue) -> FieldErrors {
    TOOL_SUBMISSION
        .decode(input)
        .expect_err("expected validation to fail")
        .field_errors()
}

// ── Successful decode ───────────────────────────────────────────

#[test]
fn valid_submission_decodes_and_normalizes() {
    let submission = TOOL_SUBMISSION.decode(&valid_input()).unwrap();

    assert_eq!(submission.name, "Acme Writer");
    assert_eq!(submission.pricing, Pricing::Freemium);
    assert_eq!(submission.categories, vec!["AI", "Writing", "Productivity"]);
    assert_eq!(submission.primary_category(), Some("AI"));
    assert_eq!(submission.secondary_categories(), ["Writing", "Productivity"]);
    assert!(submission.logo.is_none());
    assert_eq!(submission.homepage_screenshot.size, MB);
}

#[test]
fn logo_within_limits_is_accepted() {
    let mut input = valid_input();
    input.insert("logo", image("logo.jpg", "image/jpeg", MB));

    let submission = TOOL_SUBMISSION.decode(&input).unwrap();
    assert_eq!(submission.logo.unwrap().content_type, "image/jpeg");
}

#[test]
fn uploaded_bytes_are_sniffed_and_hashed() {
    let mut png = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    png.resize(2048, 0);
    let file = UploadedFile::from_upload(
        Some("shot".to_string()),
        Some("application/octet-stream"),
        Bytes::from(png),
    );

    assert_eq!(file.content_type, "image/png");
    assert_eq!(file.size, 2048);
    assert_eq!(file.sha256.as_deref().map(str::len), Some(64));

    let mut input = valid_input();
    input.insert("homepageScreenshot", file);
    assert!(TOOL_SUBMISSION.decode(&input).is_ok());
}

// ── Required fields ─────────────────────────────────────────────

#[test]
fn missing_name_is_reported() {
    let mut input = valid_input();
    input.insert("name", RawValue::Null);
    assert_eq!(field_errors(&input).get("name"), Some("Name is required."));

    let input = RawValue::from(json!({}));
    let errors = field_errors(&input);
    assert_eq!(errors.get("name"), Some("Name is required."));
    assert_eq!(errors.get("website"), Some("Website URL is required."));
    assert_eq!(errors.get("tagline"), Some("A tagline is required."));
    assert_eq!(errors.get("description"), Some("Please enter a description."));
    assert_eq!(errors.get("pricing"), Some("Please select a pricing model."));
    assert_eq!(
        errors.get("homepageScreenshot"),
        Some("A homepage screenshot is required.")
    );
    assert!(!errors.contains("logo"));
}

#[test]
fn whitespace_only_name_is_empty() {
    let mut input = valid_input();
    input.insert("name", "   ");
    assert_eq!(field_errors(&input).get("name"), Some("Name is required."));
}

#[test]
fn wrong_types_are_reported() {
    let mut input = valid_input();
    input.insert("name", RawValue::from(json!(42)));
    input.insert("categories", RawValue::from(json!({ "primary": "AI" })));
    input.insert("logo", RawValue::from(json!(true)));

    let errors = field_errors(&input);
    assert_eq!(errors.get("name"), Some("Expected a string."));
    assert_eq!(errors.get("categories"), Some("Expected a list."));
    assert_eq!(errors.get("logo"), Some("Expected a file."));
}

// ── Website ─────────────────────────────────────────────────────

#[test]
fn website_pattern() {
    for bad in ["not a url", "example", "http://", "https://exa mple.com"] {
        let mut input = valid_input();
        input.insert("website", bad);
        assert_eq!(
            field_errors(&input).get("website"),
            Some("Please enter a valid website URL."),
            "{bad} should be rejected"
        );
    }

    for good in [
        "https://example.com",
        "http://www.example.co.uk/path?q=1",
        "example.io",
        "https://sub.domain.dev/a/b#top",
    ] {
        let mut input = valid_input();
        input.insert("website", good);
        assert!(TOOL_SUBMISSION.decode(&input).is_ok(), "{good} should pass");
    }
}

#[test]
fn website_chain_stops_at_first_failure() {
    let mut input = valid_input();
    input.insert("website", "");

    let err = TOOL_SUBMISSION.decode(&input).unwrap_err();
    let website_issues: Vec<_> = err
        .issues
        .iter()
        .filter(|issue| issue.path_string() == "website")
        .collect();
    assert_eq!(website_issues.len(), 1);
    assert_eq!(website_issues[0].message, "Website URL is required.");
}

// ── Tagline & description ───────────────────────────────────────

#[test]
fn tagline_word_limit() {
    let mut input = valid_input();
    input.insert("tagline", vec!["word"; 20].join(" "));
    assert!(TOOL_SUBMISSION.decode(&input).is_ok());

    input.insert("tagline", vec!["word"; 21].join(" "));
    assert_eq!(
        field_errors(&input).get("tagline"),
        Some("Tagline must be 20 words or fewer.")
    );
}

#[test]
fn description_word_limit() {
    let mut input = valid_input();
    input.insert("description", vec!["word"; 501].join("\n"));
    assert_eq!(
        field_errors(&input).get("description"),
        Some("Description must be 500 words or fewer.")
    );
}

// ── Categories ──────────────────────────────────────────────────

#[test]
fn categories_bounds() {
    let mut input = valid_input();
    input.insert("categories", RawValue::List(Vec::new()));
    assert_eq!(
        field_errors(&input).get("categories"),
        Some("Please select/create at least one category.")
    );

    input.insert("categories", RawValue::from(json!(["a", "b", "c", "d"])));
    assert_eq!(
        field_errors(&input).get("categories"),
        Some("You can select a maximum of three categories.")
    );

    for count in 1..=3 {
        let names: Vec<String> = (0..count).map(|i| format!("cat{i}")).collect();
        input.insert("categories", RawValue::from(json!(names)));
        assert!(TOOL_SUBMISSION.decode(&input).is_ok(), "{count} categories");
    }
}

#[test]
fn empty_category_entries_are_reported_by_index() {
    let mut input = valid_input();
    input.insert("categories", RawValue::from(json!(["AI", " ", "", "x", "y"])));

    let err = TOOL_SUBMISSION.decode(&input).unwrap_err();
    let paths: Vec<_> = err.issues.iter().map(|i| i.path_string()).collect();
    assert_eq!(paths, vec!["categories.1", "categories.2"]);
    assert_eq!(
        err.issues[0].path,
        vec![PathSegment::Key("categories".to_string()), PathSegment::Index(1)]
    );
    assert_eq!(err.issues[0].message, "Category name can't be empty.");
}

#[test]
fn duplicate_categories_are_not_a_schema_error() {
    let mut input = valid_input();
    input.insert("categories", RawValue::from(json!(["AI", "AI"])));
    assert!(TOOL_SUBMISSION.decode(&input).is_ok());
}

// ── Pricing ─────────────────────────────────────────────────────

#[test]
fn pricing_must_be_a_known_option() {
    let mut input = valid_input();
    input.insert("pricing", "Enterprise");
    assert_eq!(
        field_errors(&input).get("pricing"),
        Some("Invalid pricing option selected.")
    );

    input.insert("pricing", "free");
    assert!(TOOL_SUBMISSION.decode(&input).is_err());

    input.insert("pricing", "Free");
    assert_eq!(TOOL_SUBMISSION.decode(&input).unwrap().pricing, Pricing::Free);
}

#[test]
fn unknown_pricing_is_a_single_issue() {
    let mut input = valid_input();
    input.insert("pricing", "Enterprise");
    let err = TOOL_SUBMISSION.decode(&input).unwrap_err();
    let pricing: Vec<_> = err
        .issues
        .iter()
        .filter(|issue| issue.path_string() == "pricing")
        .collect();
    assert_eq!(pricing.len(), 1);

    input.insert("pricing", "  Paid ");
    assert_eq!(TOOL_SUBMISSION.decode(&input).unwrap().pricing, Pricing::Paid);
}

// ── Files ───────────────────────────────────────────────────────

#[test]
fn logo_size_limit_names_the_cap() {
    let mut input = valid_input();
    input.insert("logo", image("logo.jpg", "image/jpeg", 3 * MB));
    assert_eq!(
        field_errors(&input).get("logo"),
        Some("Logo file size must not exceed 2MB.")
    );

    input.insert("logo", image("logo.jpg", "image/jpeg", 2 * MB));
    assert!(TOOL_SUBMISSION.decode(&input).is_ok());
}

#[test]
fn logo_type_is_checked_before_size() {
    let mut input = valid_input();
    input.insert("logo", image("logo.gif", "image/gif", 3 * MB));
    assert_eq!(
        field_errors(&input).get("logo"),
        Some("Invalid file type. Only JPG, PNG and WebP are accepted.")
    );

    input.insert("logo", image("logo.webp", "IMAGE/WEBP; q=1", MB));
    assert!(TOOL_SUBMISSION.decode(&input).is_ok());
}

#[test]
fn screenshot_size_limit() {
    let mut input = valid_input();
    input.insert("homepageScreenshot", image("home.png", "image/png", 6 * MB));
    assert_eq!(
        field_errors(&input).get("homepageScreenshot"),
        Some("Screenshot file size must not exceed 5MB.")
    );
}

#[test]
fn file_lists_hold_exactly_one_file() {
    let mut input = valid_input();
    input.insert(
        "homepageScreenshot",
        RawValue::List(vec![image("home.png", "image/png", MB).into()]),
    );
    assert!(TOOL_SUBMISSION.decode(&input).is_ok());

    input.insert(
        "homepageScreenshot",
        RawValue::List(vec![
            image("a.png", "image/png", MB).into(),
            image("b.png", "image/png", MB).into(),
        ]),
    );
    assert_eq!(
        field_errors(&input).get("homepageScreenshot"),
        Some("Only one file can be uploaded.")
    );

    input.insert("homepageScreenshot", "");
    assert_eq!(
        field_errors(&input).get("homepageScreenshot"),
        Some("A homepage screenshot is required.")
    );
}

#[test]
fn files_are_validated_independently() {
    let mut input = valid_input();
    input.insert("logo", image("logo.bmp", "image/bmp", MB));
    input.insert("homepageScreenshot", image("home.png", "image/png", 10 * MB));

    let errors = field_errors(&input);
    assert_eq!(errors.len(), 2);
    assert!(errors.contains("logo"));
    assert!(errors.contains("homepageScreenshot"));
}

// ── Error mapping ───────────────────────────────────────────────

#[test]
fn issues_follow_schema_field_order() {
    let err = TOOL_SUBMISSION.decode(&RawValue::from(json!({}))).unwrap_err();
    let paths: Vec<_> = err.issues.iter().map(|i| i.path_string()).collect();
    assert_eq!(
        paths,
        vec![
            "name",
            "website",
            "tagline",
            "description",
            "categories",
            "pricing",
            "homepageScreenshot",
        ]
    );
}

#[test]
fn first_issue_for_a_path_wins() {
    let issues = vec![
        ValidationIssue::new(vec!["name".into()], "first"),
        ValidationIssue::new(vec!["website".into()], "other"),
        ValidationIssue::new(vec!["name".into()], "second"),
        ValidationIssue::new(vec!["categories".into(), PathSegment::Index(0)], "nested"),
    ];

    let errors = FieldErrors::from_issues(&issues);
    assert_eq!(errors.len(), 3);
    assert_eq!(errors.get("name"), Some("first"));
    assert_eq!(errors.get("categories.0"), Some("nested"));
    assert_eq!(
        serde_json::to_value(&errors).unwrap(),
        json!({ "name": "first", "website": "other", "categories.0": "nested" })
    );
}

#[test]
fn validation_is_idempotent() {
    let input = RawValue::from(json!({
        "name": "",
        "website": "not a url",
        "categories": ["", "x"],
        "pricing": "Enterprise",
    }));

    let first = field_errors(&input);
    let second = field_errors(&input);
    assert_eq!(first, second);
}

#[test]
fn non_object_input_is_a_root_issue() {
    let err = TOOL_SUBMISSION.decode(&RawValue::from("hello")).unwrap_err();
    assert_eq!(err.issues.len(), 1);
    assert!(err.issues[0].path.is_empty());
    assert_eq!(err.field_errors().get(""), Some("Expected a form submission."));
}

// ── Forgot password ─────────────────────────────────────────────

#[test]
fn forgot_password_email_rules() {
    let errors = FORGOT_PASSWORD
        .decode(&RawValue::from(json!({})))
        .unwrap_err()
        .field_errors();
    assert_eq!(errors.get("email"), Some("Email is required."));

    let errors = FORGOT_PASSWORD
        .decode(&RawValue::from(json!({ "email": "someone" })))
        .unwrap_err()
        .field_errors();
    assert_eq!(errors.get("email"), Some("Please enter a valid email address."));

    let request = FORGOT_PASSWORD
        .decode(&RawValue::from(json!({ "email": " someone@example.com " })))
        .unwrap();
    assert_eq!(request.email, "someone@example.com");
}

#[test]
fn long_email_only_needs_the_address_shape() {
    let email = format!("{}@example.com", "a".repeat(300));
    let request = FORGOT_PASSWORD
        .decode(&RawValue::from(json!({ "email": email })))
        .unwrap();
    assert_eq!(request.email, email);
}

#[test]
fn reset_requests_expose_only_the_domain() {
    let request = FORGOT_PASSWORD
        .decode(&RawValue::from(json!({ "email": "alice@mail.example.com" })))
        .unwrap();
    assert_eq!(request.domain(), "mail.example.com");
}
