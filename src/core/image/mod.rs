use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("image not found: {0}")]
    NotFound(String),
    #[error("image decode failed: {0}")]
    Decode(String),
    #[error("image request failed: {0}")]
    Network(String),
}

pub type Result<T> = std::result::Result<T, ImageError>;

/// Opaque handle to a decoded image owned by the platform image layer. The
/// core never inspects pixels; it only stores and compares handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageHandle(pub u64);

/// Identifies one background-image URL request. Tokens increase
/// monotonically per tree, so a completion carrying an old token can be
/// recognized as stale and discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestToken(pub u64);

/// The image-loading collaborator. File/resource and base64 loads complete
/// synchronously; URL loads are begun here and completed later by the host
/// through `ViewTree::complete_background_image` with the same token.
pub trait ImageLoader {
    fn load_from_file_or_resource(&mut self, path: &str) -> Result<ImageHandle>;
    fn load_from_base64(&mut self, data: &str) -> Result<ImageHandle>;
    fn load_from_url(&mut self, url: &str, token: RequestToken);
}

/// Loader for headless use: synchronous loads hand out fresh handles and URL
/// requests are only recorded, never fetched.
#[derive(Debug, Default)]
pub struct HeadlessImageLoader {
    next_handle: u64,
    pub url_requests: Vec<(String, RequestToken)>,
}

impl HeadlessImageLoader {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ImageLoader for HeadlessImageLoader {
    fn load_from_file_or_resource(&mut self, _path: &str) -> Result<ImageHandle> {
        self.next_handle += 1;
        Ok(ImageHandle(self.next_handle))
    }

    fn load_from_base64(&mut self, _data: &str) -> Result<ImageHandle> {
        self.next_handle += 1;
        Ok(ImageHandle(self.next_handle))
    }

    fn load_from_url(&mut self, url: &str, token: RequestToken) {
        self.url_requests.push((url.to_string(), token));
    }
}

/// Strips a CSS `url("...")` / `url('...')` wrapper if present.
pub fn unwrap_css_url(value: &str) -> &str {
    let trimmed = value.trim();
    let inner = match trimmed.strip_prefix("url(").and_then(|r| r.strip_suffix(')')) {
        Some(inner) => inner.trim(),
        None => return trimmed,
    };
    for quote in ['"', '\''] {
        if let Some(unquoted) = inner
            .strip_prefix(quote)
            .and_then(|r| r.strip_suffix(quote))
        {
            return unquoted;
        }
    }
    inner
}

pub fn is_data_uri(value: &str) -> bool {
    value.starts_with("data:")
}

pub fn is_file_or_resource_path(value: &str) -> bool {
    value.starts_with("res://")
        || value.starts_with("file://")
        || value.starts_with("~/")
        || value.starts_with('/')
}
