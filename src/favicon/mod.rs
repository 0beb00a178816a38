pub mod fetcher;
pub mod lookup;
pub mod normalize;
pub mod page;
pub mod types;

pub use fetcher::ImageFetcher;
pub use normalize::{normalize_url, root_origin, ResolvedUrl};
pub use types::{CandidateIcon, CandidateSummary, FetchError, IconSource};

use image::{DynamicImage, ImageFormat};
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::thread;

use crate::config::FaviconConfig;
use crate::http::{HttpClient, ReqwestClient};

// Icon downloads of one strategy run side by side, this many at a time
const MAX_PARALLEL_FETCHES: usize = 8;

const FAVICON_PATH: &str = "/favicon.ico";

/// Search `url` for icons with a fresh HTTP client built from `config`.
///
/// Never fails: a site with no usable icon and a site that could not be
/// reached both give an empty list.
pub fn discover(url: &str, config: &FaviconConfig) -> Vec<CandidateIcon> {
    let client = match ReqwestClient::new(config) {
        Ok(client) => client,
        Err(err) => {
            log::error!("could not build http client: {err}");
            return Vec::new();
        }
    };

    FaviconDiscovery::new(&client, config).discover(url)
}

/// Sort candidates tallest first. Equal heights keep discovery order.
pub fn rank(mut candidates: Vec<CandidateIcon>) -> Vec<CandidateIcon> {
    candidates.sort_by(|a, b| b.height().cmp(&a.height()));
    candidates
}

pub struct FaviconDiscovery<'a> {
    client: &'a dyn HttpClient,
    config: &'a FaviconConfig,
    icon_dir: PathBuf,
}

impl<'a> FaviconDiscovery<'a> {
    pub fn new(client: &'a dyn HttpClient, config: &'a FaviconConfig) -> Self {
        let icon_dir = config.icon_dir.clone().unwrap_or_else(std::env::temp_dir);
        Self {
            client,
            config,
            icon_dir,
        }
    }

    /// Run the lookup service first; scrape the page only if the lookup
    /// could not be completed.
    ///
    /// A lookup that answers with no usable icons ends discovery right there,
    /// unless `fallback_on_empty_lookup` is set.
    pub fn discover(&self, url: &str) -> Vec<CandidateIcon> {
        let resolved = ResolvedUrl::parse(url);
        let root = resolved.root_origin();
        let mut candidates = Vec::new();

        match self.grab_from_lookup(&resolved, &root, &mut candidates) {
            Ok(()) if candidates.is_empty() && self.config.fallback_on_empty_lookup => {
                log::info!("{resolved}: strategy=lookup outcome=empty, scraping page");
            }
            Ok(()) => {
                log::info!(
                    "{resolved}: strategy=lookup outcome=success count={}",
                    candidates.len()
                );
                return rank(candidates);
            }
            Err(err) => {
                log::warn!("{resolved}: strategy=lookup outcome=error err={err}");
            }
        }

        match self.grab_from_page(&resolved, &root, &mut candidates) {
            Ok(()) => log::info!(
                "{resolved}: strategy=page outcome=success count={}",
                candidates.len()
            ),
            Err(err) => log::warn!("{resolved}: strategy=page outcome=error err={err}"),
        }

        rank(candidates)
    }

    fn grab_from_lookup(
        &self,
        resolved: &ResolvedUrl,
        root: &str,
        out: &mut Vec<CandidateIcon>,
    ) -> Result<(), FetchError> {
        let icons = match lookup::grab(self.client, &self.config.lookup_host, &resolved.host)? {
            Some(icons) => icons,
            None => return Ok(()),
        };

        let links = icons
            .into_iter()
            .map(|icon| {
                log::debug!("{root}: lookup offers {} ({})", icon.src, icon.advertised());
                (IconSource::FaviconGrabber, icon.src)
            })
            .collect();

        self.collect(root, links, out)
    }

    fn grab_from_page(
        &self,
        resolved: &ResolvedUrl,
        root: &str,
        out: &mut Vec<CandidateIcon>,
    ) -> Result<(), FetchError> {
        let page_url = resolved.to_string();
        let resp = self.client.get(&page_url)?;
        if !resp.status.is_success() {
            // error pages still tend to carry the site's icons
            log::debug!("{page_url}: page answered {}, parsing anyway", resp.status);
        }

        let html = String::from_utf8_lossy(&resp.body);
        let page_icons = page::parse_page_icons(&html);

        let mut links = page_icons.links;
        links.push((IconSource::Favicon, FAVICON_PATH.to_string()));
        if let Some(og_image) = page_icons.og_image {
            links.push((IconSource::OgImage, og_image));
        }

        self.collect(root, links, out)
    }

    /// Fetch every link, then persist the ones that decoded, in link order.
    fn collect(
        &self,
        root: &str,
        links: Vec<(IconSource, String)>,
        out: &mut Vec<CandidateIcon>,
    ) -> Result<(), FetchError> {
        let fetcher = ImageFetcher::new(self.client, self.config.max_icon_height);

        for chunk in links.chunks(MAX_PARALLEL_FETCHES) {
            let images: Vec<(IconSource, Option<DynamicImage>)> = thread::scope(|s| {
                let handles: Vec<_> = chunk
                    .iter()
                    .map(|(source, link)| {
                        let fetcher = &fetcher;
                        s.spawn(move || (*source, fetcher.fetch(root, link)))
                    })
                    .collect();

                handles
                    .into_iter()
                    .filter_map(|h| match h.join() {
                        Ok(result) => Some(result),
                        Err(_) => {
                            log::error!("{root}: icon fetch thread panicked");
                            None
                        }
                    })
                    .collect()
            });

            for (source, image) in images {
                let Some(image) = image else {
                    continue;
                };
                let path = persist_icon(&self.icon_dir, &image)?;
                log::debug!("{root}: source={source} saved to {}", path.display());
                out.push(CandidateIcon {
                    source,
                    image,
                    path,
                });
            }
        }

        Ok(())
    }
}

/// Encode `image` as PNG into a new uniquely named file under `dir`.
/// The file is kept on disk; the caller owns it from here on.
pub fn persist_icon(dir: &Path, image: &DynamicImage) -> Result<PathBuf, FetchError> {
    std::fs::create_dir_all(dir)?;

    let mut encoded = Vec::new();
    DynamicImage::ImageRgba8(image.to_rgba8())
        .write_to(&mut Cursor::new(&mut encoded), ImageFormat::Png)
        .map_err(|err| FetchError::Storage(std::io::Error::other(err)))?;

    let mut file = tempfile::Builder::new()
        .prefix("webapp-icon-")
        .suffix(".png")
        .tempfile_in(dir)?;
    file.write_all(&encoded)?;
    file.flush()?;

    let (_file, path) = file.keep().map_err(|err| FetchError::Storage(err.error))?;
    Ok(path)
}
