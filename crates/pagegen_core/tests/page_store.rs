use pagegen_core::db::open_db_in_memory;
use pagegen_core::{ContentDocument, Page, PageRepository, RepoError, SqlitePageRepository};
use serde_json::json;
use uuid::Uuid;

fn content(title: &str, slug: &str) -> ContentDocument {
    ContentDocument::from_value(&json!({
        "title": title,
        "slug": slug,
        "description": "Deployment automation",
        "hero": {"headline": "Ship Faster", "subheadline": "CI/CD", "ctaText": "Get Started"},
        "features": [{"title": "Pipelines", "description": "Declarative", "icon": "rocket"}],
        "benefits": {"headline": "Why", "items": ["Less toil", "More sleep"]},
        "cta": {"headline": "Start Today", "subheadline": "Free", "buttonText": "Try Now"},
        "style": {"primaryColor": "#2563eb", "theme": "bold"}
    }))
    .unwrap()
}

#[test]
fn insert_and_lookup_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePageRepository::new(&conn);

    let page = Page::publish(
        "user-1",
        "deployflow",
        content("DeployFlow", "deployflow"),
        1_700_000_000_000,
    );
    repo.insert_page(&page).unwrap();

    let by_slug = repo.get_published_by_slug("deployflow").unwrap().unwrap();
    assert_eq!(by_slug, page);
    assert_eq!(by_slug.title, "DeployFlow");
    assert_eq!(by_slug.description, "Deployment automation");
    assert!(by_slug.published);

    let by_id = repo.get_page(page.id).unwrap().unwrap();
    assert_eq!(by_id, page);
}

#[test]
fn lookup_of_missing_slug_or_id_is_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePageRepository::new(&conn);

    assert!(repo.get_published_by_slug("nope").unwrap().is_none());
    assert!(repo.get_page(Uuid::new_v4()).unwrap().is_none());
}

#[test]
fn unpublished_pages_are_hidden_from_slug_lookup() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePageRepository::new(&conn);

    let mut page = Page::publish("user-1", "draft", content("Draft", "draft"), 0);
    page.published = false;
    repo.insert_page(&page).unwrap();

    assert!(repo.get_published_by_slug("draft").unwrap().is_none());
    assert!(!repo.get_page(page.id).unwrap().unwrap().published);
}

#[test]
fn duplicate_slug_is_reported_as_slug_taken_and_writes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePageRepository::new(&conn);

    let first = Page::publish("user-1", "acme", content("Acme", "acme"), 0);
    let second = Page::publish("user-2", "acme", content("Acme Two", "acme"), 0);
    repo.insert_page(&first).unwrap();

    let err = repo.insert_page(&second).unwrap_err();
    assert!(matches!(err, RepoError::SlugTaken(ref slug) if slug == "acme"));
    assert!(repo.get_page(second.id).unwrap().is_none());
    assert_eq!(repo.get_published_by_slug("acme").unwrap().unwrap().id, first.id);
}

#[test]
fn duplicate_id_is_a_db_error_not_a_slug_collision() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePageRepository::new(&conn);

    let first = Page::publish("user-1", "one", content("One", "one"), 0);
    let mut clash = Page::publish("user-1", "two", content("Two", "two"), 0);
    clash.id = first.id;
    repo.insert_page(&first).unwrap();

    let err = repo.insert_page(&clash).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
}

#[test]
fn invalid_content_is_rejected_before_insert() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePageRepository::new(&conn);

    let mut page = Page::publish("user-1", "blank", content("Blank", "blank"), 0);
    page.content.hero.headline = "  ".to_string();

    let err = repo.insert_page(&page).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert!(repo.get_page(page.id).unwrap().is_none());
}

#[test]
fn corrupted_content_blob_is_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePageRepository::new(&conn);

    let page = Page::publish("user-1", "broken", content("Broken", "broken"), 0);
    repo.insert_page(&page).unwrap();
    conn.execute(
        "UPDATE pages SET content = '{\"title\": \"\"}' WHERE id = ?1;",
        [page.id.to_string()],
    )
    .unwrap();

    let err = repo.get_published_by_slug("broken").unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}
