use crate::crawler::ImageRequest;
use crate::extract::dom::attr_first;
use crate::extract::profile::CompiledProfile;
use crate::extract::record::ImageRef;
use crate::url::{image_file_name, resolve_image};
use scraper::ElementRef;
use url::Url;

/// Resolves an `<img>` into the record's image reference and a download request
///
/// The source is the first configured attribute that resolves to an HTTP(S)
/// URL, which skips lazy-loading `data:` placeholders. The filename comes from
/// the declared image name or alt text, falling back to `fallback_name`.
pub fn image_from(
    img: ElementRef<'_>,
    profile: &CompiledProfile,
    root: &Url,
    fallback_name: &str,
) -> Option<(ImageRef, ImageRequest)> {
    let url = profile
        .image_src_attrs
        .iter()
        .filter_map(|attr| img.value().attr(attr))
        .find_map(|src| resolve_image(root, src))?;

    let hint = attr_first(img, &profile.image_name_attrs).unwrap_or_else(|| fallback_name.to_string());
    let file_name = image_file_name(&hint, &url)?;

    let image = ImageRef {
        img_url: url.to_string(),
        img_name: file_name.clone(),
    };
    Some((image, ImageRequest { url, file_name }))
}

/// Splits an optional image pair, queueing the download request
pub fn queue(pair: Option<(ImageRef, ImageRequest)>, requests: &mut Vec<ImageRequest>) -> Option<ImageRef> {
    pair.map(|(image, request)| {
        requests.push(request);
        image
    })
}
