use std::path::Path;
use url::Url;

/// Extensions recognized as downloadable images
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// Derives the local filename for an image
///
/// Whitespace is stripped from the declared name and path separators are
/// replaced. If the name carries no known image extension, the extension is
/// inferred from the source URL by scanning its path segments from the end,
/// since wiki CDNs serve files as `.../Crowbar.png/revision/latest`. When
/// nothing can be inferred the name is returned as is.
///
/// Falls back to the URL's own filename when the declared name is empty.
/// Returns `None` only when neither yields a usable name.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use handbook_scraper::url::image_file_name;
///
/// let src = Url::parse("https://static.wikia.nocookie.net/x/images/a/ab/Crowbar.png/revision/latest").unwrap();
/// assert_eq!(image_file_name("Crowbar", &src).as_deref(), Some("Crowbar.png"));
/// assert_eq!(image_file_name("Soldier's Syringe.png", &src).as_deref(), Some("Soldier'sSyringe.png"));
/// ```
pub fn image_file_name(hint: &str, source: &Url) -> Option<String> {
    let mut name = sanitize(hint);
    if name.is_empty() {
        name = source
            .path_segments()
            .and_then(|segments| {
                segments
                    .rev()
                    .find(|segment| known_extension(segment).is_some())
                    .map(sanitize)
            })
            .unwrap_or_default();
    }

    if name.is_empty() {
        return None;
    }

    if known_extension(&name).is_some() {
        return Some(name);
    }

    match infer_extension(source) {
        Some(ext) => Some(format!("{}.{}", name, ext)),
        None => Some(name),
    }
}

/// Returns the part of an image filename before its first `.`
///
/// This is the key under which the generated image map exposes the file.
pub fn image_stem(name: &str) -> &str {
    match name.find('.') {
        Some(idx) => &name[..idx],
        None => name,
    }
}

/// Returns true if the path has one of the image extensions
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

fn sanitize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == '/' || c == '\\' { '-' } else { c })
        .collect()
}

fn known_extension(name: &str) -> Option<String> {
    let (_, ext) = name.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    IMAGE_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

fn infer_extension(source: &Url) -> Option<String> {
    source
        .path_segments()?
        .rev()
        .find_map(known_extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn src(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_strip_whitespace_keep_extension() {
        let url = src("https://cdn.example.com/images/Focus_Crystal.png");
        assert_eq!(
            image_file_name("Focus Crystal.png", &url).as_deref(),
            Some("FocusCrystal.png")
        );
    }

    #[test]
    fn test_infer_extension_from_revision_url() {
        let url = src("https://static.wikia.nocookie.net/riskofrain2/images/5/5d/Crowbar.png/revision/latest?cb=1");
        assert_eq!(image_file_name("Crowbar", &url).as_deref(), Some("Crowbar.png"));
    }

    #[test]
    fn test_infer_extension_plain_url() {
        let url = src("https://cdn.example.com/images/Ukulele.JPG");
        assert_eq!(image_file_name("Ukulele", &url).as_deref(), Some("Ukulele.jpg"));
    }

    #[test]
    fn test_no_extension_inferable() {
        let url = src("https://cdn.example.com/thumb/12345");
        assert_eq!(image_file_name("Mystery Box", &url).as_deref(), Some("MysteryBox"));
    }

    #[test]
    fn test_empty_hint_falls_back_to_url() {
        let url = src("https://cdn.example.com/images/Soldier_Syringe.png/revision/latest");
        assert_eq!(
            image_file_name("  ", &url).as_deref(),
            Some("Soldier_Syringe.png")
        );
    }

    #[test]
    fn test_empty_hint_and_no_file_in_url() {
        let url = src("https://cdn.example.com/thumb/12345");
        assert_eq!(image_file_name("", &url), None);
    }

    #[test]
    fn test_path_separators_replaced() {
        let url = src("https://cdn.example.com/a.png");
        assert_eq!(image_file_name("AC/DC", &url).as_deref(), Some("AC-DC.png"));
    }

    #[test]
    fn test_image_stem() {
        assert_eq!(image_stem("Crowbar.png"), "Crowbar");
        assert_eq!(image_stem("Artifact.of.Honor.png"), "Artifact");
        assert_eq!(image_stem("NoExt"), "NoExt");
    }

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file(Path::new("imgs/Crowbar.png")));
        assert!(is_image_file(Path::new("imgs/Photo.JPEG")));
        assert!(!is_image_file(Path::new("imgs/images.js")));
        assert!(!is_image_file(Path::new("imgs/README")));
    }
}
