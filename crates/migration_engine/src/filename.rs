use url::Url;

const FALLBACK_BASENAME: &str = "image";
const MAX_NAME_LEN: usize = 120;

/// Local file name for a post's image: `{slug}_{basename}`.
///
/// The slug prefix keeps generic CDN names (`image.jpg`) from colliding across posts.
pub fn asset_filename(slug: &str, image_url: &str) -> String {
    let basename = sanitize(&url_basename(image_url));
    let basename = if basename.is_empty() {
        FALLBACK_BASENAME.to_string()
    } else {
        basename
    };
    let slug = sanitize(slug);
    let mut name = if slug.is_empty() {
        basename
    } else {
        format!("{slug}_{basename}")
    };
    truncate_keeping_extension(&mut name);
    if is_reserved_windows_name(&name) {
        name.insert(0, '_');
    }
    name
}

fn url_basename(image_url: &str) -> String {
    let path = match Url::parse(image_url) {
        Ok(url) => url.path().to_string(),
        Err(_) => image_url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };
    path.rsplit('/').next().unwrap_or_default().to_string()
}

fn sanitize(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    cleaned.trim_matches(&['_', ' ', '.'][..]).to_string()
}

fn truncate_keeping_extension(name: &mut String) {
    if name.len() <= MAX_NAME_LEN {
        return;
    }
    let ext = name
        .rfind('.')
        .map(|idx| name[idx..].to_string())
        .filter(|ext| ext.len() <= 8)
        .unwrap_or_default();
    let mut end = MAX_NAME_LEN - ext.len();
    while end > 0 && !name.is_char_boundary(end) {
        end -= 1;
    }
    name.truncate(end);
    name.push_str(&ext);
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    let stem = name.split('.').next().unwrap_or(name);
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(stem))
}
