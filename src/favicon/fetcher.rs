use image::{imageops::FilterType, DynamicImage};

use super::FetchError;
use crate::http::HttpClient;

/// Turn a possibly site-relative `link` into an absolute URL under `root_origin`.
pub fn resolve_link(root_origin: &str, link: &str) -> String {
    if link.contains("://") {
        return link.to_string();
    }

    // protocol-relative: keep the site's scheme, not its host
    if let Some(rest) = link.strip_prefix("//") {
        let scheme = root_origin.split("://").next().unwrap_or("http");
        return format!("{scheme}://{rest}");
    }

    if link.starts_with('/') {
        format!("{root_origin}{link}")
    } else {
        format!("{root_origin}/{link}")
    }
}

/// Scale `image` down to exactly `max_height` x `max_height` if it is taller
/// than that. Smaller images keep their size and aspect.
pub fn downscale(image: DynamicImage, max_height: u32) -> DynamicImage {
    if image.height() > max_height {
        image.resize_exact(max_height, max_height, FilterType::CatmullRom)
    } else {
        image
    }
}

/// Downloads and decodes single icon links.
pub struct ImageFetcher<'a> {
    client: &'a dyn HttpClient,
    max_height: u32,
}

impl<'a> ImageFetcher<'a> {
    pub fn new(client: &'a dyn HttpClient, max_height: u32) -> Self {
        Self { client, max_height }
    }

    /// Fetch `link` relative to `root_origin`. Failures are logged and give `None`.
    pub fn fetch(&self, root_origin: &str, link: &str) -> Option<DynamicImage> {
        let link = link.trim();
        if link.starts_with("data:") {
            log::debug!("{root_origin}: inline data icons are not supported");
            return None;
        }

        let url = resolve_link(root_origin, link);
        match self.try_fetch(&url) {
            Ok(image) => {
                log::debug!("{url}: decoded {}x{}", image.width(), image.height());
                Some(image)
            }
            Err(err) => {
                log::info!("{url}: {err}");
                None
            }
        }
    }

    fn try_fetch(&self, url: &str) -> Result<DynamicImage, FetchError> {
        let resp = self.client.get(url)?;
        if !resp.status.is_success() {
            return Err(FetchError::NotFound(format!("status {}", resp.status)));
        }

        let image = image::load_from_memory(&resp.body)
            .map_err(|err| FetchError::Decode(err.to_string()))?;

        if image.height() == 0 {
            return Err(FetchError::Decode("image has no rows".to_string()));
        }

        Ok(downscale(image, self.max_height))
    }
}
