use migration_core::{derive_slug, upgrade_image_size, RawEntry};
use pretty_assertions::assert_eq;

fn first_post() -> RawEntry {
    RawEntry {
        title: "My First Post".to_string(),
        content: "<p>Hi</p>".to_string(),
        summary: "Hello".to_string(),
        published: "Mon, 10 May 2021 00:00:00 GMT".to_string(),
        link: "https://example.com/2021/05/10/my-first-post/".to_string(),
    }
}

#[test]
fn normalized_post_carries_feed_fields_through() {
    let post = first_post().normalize();

    assert_eq!(post.slug, "my-first-post");
    assert_eq!(post.title, "My First Post");
    assert_eq!(post.content, "<p>Hi</p>");
    assert_eq!(post.excerpt, "Hello");
    assert_eq!(post.date, "2021-05-10T00:00:00+00:00");
}

#[test]
fn slug_is_reproducible_across_runs() {
    let a = first_post().normalize();
    let b = first_post().normalize();
    assert_eq!(a.slug, b.slug);
}

#[test]
fn slug_is_last_non_empty_segment() {
    let cases = [
        ("https://example.com/post", "post"),
        ("https://example.com/post/", "post"),
        ("https://example.com/a/b/c//", "c"),
        ("post-only", "post-only"),
    ];
    for (link, expected) in cases {
        assert_eq!(derive_slug(link), expected, "link {link}");
        assert!(!derive_slug(link).is_empty());
    }
}

#[test]
fn empty_link_yields_empty_slug() {
    let entry = RawEntry {
        link: String::new(),
        ..first_post()
    };
    assert_eq!(entry.normalize().slug, "");
}

#[test]
fn cdn_scenario_upgrades_to_largest_size() {
    assert_eq!(
        upgrade_image_size("https://cdn.example.com/content/images/size/w600/photo.jpg"),
        "https://cdn.example.com/content/images/size/w2000/photo.jpg"
    );
}

#[test]
fn cdn_upgrade_of_max_size_is_identity() {
    let url = "https://cdn.example.com/content/images/size/w2000/photo.jpg";
    assert_eq!(upgrade_image_size(url), url);
}
