use std::path::PathBuf;

pub fn fixture_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(relative)
}

pub fn load_fixture(relative: &str) -> String {
    std::fs::read_to_string(fixture_path(relative))
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", relative))
}

/// A minimal detail page carrying just a title.
pub fn titled_page(title: &str) -> String {
    format!(
        r#"<html><body>
        <h1 class="title product-field">{title}</h1>
        <h1 class="title product-field">{title}</h1>
        </body></html>"#
    )
}
