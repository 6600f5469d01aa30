//! Fallback descriptions for images without usable alt text.

use crate::text_utils::collapse_whitespace;
use async_trait::async_trait;
use url::Url;

pub const NO_DESCRIPTION: &str = "Image with no description";

/// Everything a describer gets to look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSource {
    pub src: Option<String>,
    pub base_url: Option<Url>,
}

/// Produces a spoken description for an image. May suspend.
#[async_trait]
pub trait ImageDescriber: Send + Sync {
    async fn describe(&self, image: ImageSource) -> String;
}

/// Describes an image by its file name: `sunset-beach.jpg` becomes
/// "Image: sunset beach". Best effort only.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilenameDescriber;

#[async_trait]
impl ImageDescriber for FilenameDescriber {
    async fn describe(&self, image: ImageSource) -> String {
        generate_alt_text(&image)
    }
}

pub fn generate_alt_text(image: &ImageSource) -> String {
    match image_name(image) {
        Some(name) => format!("Image: {name}"),
        None => NO_DESCRIPTION.to_string(),
    }
}

fn image_name(image: &ImageSource) -> Option<String> {
    let src = image.src.as_deref()?.trim();
    if src.is_empty() {
        return None;
    }
    let resolved = match &image.base_url {
        Some(base) => base.join(src).ok(),
        None => Url::parse(src).ok(),
    };
    let segment = match &resolved {
        Some(url) if url.cannot_be_a_base() => return None,
        Some(url) => url.path_segments()?.next_back()?.to_string(),
        // Relative reference with nothing to resolve against.
        None => {
            let path = src.split(['?', '#']).next().unwrap_or_default();
            path.rsplit('/').next().unwrap_or_default().to_string()
        }
    };

    let decoded = match urlencoding::decode(&segment) {
        Ok(cow) => cow.into_owned(),
        Err(_) => segment.clone(),
    };
    // Everything from the first dot on is dropped: `photo.final.jpg` is "photo".
    let stem = decoded.split('.').next().unwrap_or_default();
    let name = collapse_whitespace(&stem.replace(['-', '_'], " "));
    (!name.is_empty()).then_some(name)
}
