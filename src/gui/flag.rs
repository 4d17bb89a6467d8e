//! Flag image fetched in the background and cached as a texture.
//!
//! A single worker thread owns the HTTP client and serves requests in order.
//! When several selections arrive while it is busy, only the newest is fetched.

use anyhow::Result;
use egui::{ColorImage, TextureHandle, TextureOptions};
use reqwest::blocking::Client;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

struct FetchResult {
    url: String,
    outcome: Result<ColorImage, String>,
}

/// Channels to the fetch thread. Dropping it stops the thread.
struct FlagWorker {
    request_tx: Sender<String>,
    result_rx: Receiver<FetchResult>,
}

impl FlagWorker {
    fn spawn() -> Self {
        let (request_tx, request_rx) = channel::<String>();
        let (result_tx, result_rx) = channel();

        thread::spawn(move || {
            let client = Client::builder().timeout(FETCH_TIMEOUT).build();
            while let Ok(first) = request_rx.recv() {
                let url = newest_request(first, &request_rx);
                let outcome = match &client {
                    Ok(client) => fetch(client, &url).map_err(|e| format!("{:#}", e)),
                    Err(e) => Err(format!("HTTP client unavailable: {}", e)),
                };
                if result_tx.send(FetchResult { url, outcome }).is_err() {
                    break;
                }
            }
        });

        Self {
            request_tx,
            result_rx,
        }
    }
}

/// Skip over requests superseded while the worker was busy.
fn newest_request(first: String, queued: &Receiver<String>) -> String {
    queued.try_iter().last().unwrap_or(first)
}

fn fetch(client: &Client, url: &str) -> Result<ColorImage> {
    let bytes = client.get(url).send()?.error_for_status()?.bytes()?;
    let image = image::load_from_memory(&bytes)?.to_rgba8();
    let size = [image.width() as usize, image.height() as usize];
    Ok(ColorImage::from_rgba_unmultiplied(size, image.as_raw()))
}

/// Loads the flag of the selected country without blocking the UI.
#[derive(Default)]
pub struct FlagLoader {
    url: Option<String>,
    texture: Option<TextureHandle>,
    worker: Option<FlagWorker>,
    pending: bool,
    failed: bool,
}

impl FlagLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start fetching `url`. A request for the current URL is a no-op; `None`
    /// clears the flag.
    pub fn request(&mut self, url: Option<&str>) {
        if self.url.as_deref() == url {
            return;
        }
        self.url = url.map(str::to_string);
        self.texture = None;
        self.failed = false;
        self.pending = false;

        let Some(url) = self.url.clone() else {
            return;
        };
        debug!("Fetching flag {}", url);

        let worker = self.worker.get_or_insert_with(FlagWorker::spawn);
        if worker.request_tx.send(url).is_err() {
            warn!("Flag worker stopped");
            self.worker = None;
            self.failed = true;
            return;
        }
        self.pending = true;
    }

    /// Pick up finished fetches. Results for anything but the current URL are dropped.
    pub fn poll(&mut self, ctx: &egui::Context) {
        let Some(worker) = &self.worker else {
            return;
        };
        let results: Vec<FetchResult> = worker.result_rx.try_iter().collect();
        for result in results {
            if self.url.as_deref() != Some(result.url.as_str()) {
                continue;
            }
            self.pending = false;
            match result.outcome {
                Ok(image) => {
                    self.texture =
                        Some(ctx.load_texture("country_flag", image, TextureOptions::LINEAR));
                }
                Err(error) => {
                    warn!("Flag unavailable: {}: {}", result.url, error);
                    self.failed = true;
                }
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pending
    }

    pub fn show(&self, ui: &mut egui::Ui, max_width: f32) {
        if let Some(texture) = &self.texture {
            ui.add(egui::Image::from_texture(texture).max_width(max_width));
        } else if self.is_loading() {
            ui.spinner();
        } else if self.failed || self.url.is_none() {
            ui.label(egui::RichText::new("No flag available").color(egui::Color32::GRAY));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FI: &str = "https://flagpedia.net/data/flags/h80/fi.png";
    const SE: &str = "https://flagpedia.net/data/flags/h80/se.png";

    /// Loader wired to in-test channels instead of the fetch thread.
    fn wired_loader() -> (FlagLoader, Receiver<String>, Sender<FetchResult>) {
        let (request_tx, request_rx) = channel();
        let (result_tx, result_rx) = channel();
        let loader = FlagLoader {
            worker: Some(FlagWorker {
                request_tx,
                result_rx,
            }),
            ..FlagLoader::default()
        };
        (loader, request_rx, result_tx)
    }

    #[test]
    fn test_request_none_clears() {
        let mut loader = FlagLoader::new();
        loader.request(None);
        assert!(!loader.is_loading());
        assert!(loader.url.is_none());
        assert!(loader.worker.is_none());
    }

    #[test]
    fn test_same_url_is_not_refetched() {
        let (mut loader, requests, _results) = wired_loader();
        loader.request(Some(FI));
        loader.request(Some(FI));
        assert_eq!(requests.try_iter().collect::<Vec<_>>(), vec![FI.to_string()]);
        assert!(loader.is_loading());
    }

    #[test]
    fn test_requests_share_one_worker() {
        let (mut loader, requests, _results) = wired_loader();
        loader.request(Some(FI));
        loader.request(Some(SE));
        assert_eq!(
            requests.try_iter().collect::<Vec<_>>(),
            vec![FI.to_string(), SE.to_string()]
        );
    }

    #[test]
    fn test_newest_request_skips_superseded() {
        let (tx, rx) = channel();
        for country in ["de", "dk", "ee"] {
            tx.send(country.to_string()).unwrap();
        }
        assert_eq!(newest_request("at".to_string(), &rx), "ee");
        assert_eq!(newest_request("at".to_string(), &rx), "at");
    }

    #[test]
    fn test_poll_ignores_stale_results() {
        let ctx = egui::Context::default();
        let (mut loader, _requests, results) = wired_loader();
        loader.request(Some(FI));
        loader.request(Some(SE));

        results
            .send(FetchResult {
                url: FI.to_string(),
                outcome: Err("404".to_string()),
            })
            .unwrap();
        loader.poll(&ctx);
        assert!(loader.is_loading());
        assert!(!loader.failed);

        results
            .send(FetchResult {
                url: SE.to_string(),
                outcome: Err("timed out".to_string()),
            })
            .unwrap();
        loader.poll(&ctx);
        assert!(!loader.is_loading());
        assert!(loader.failed);
    }
}
