//! HTTP transport seam. The client only needs "POST this form, give me the body".

use curl::easy::{Easy, List};

use super::ApiError;
use crate::config::FipeConfig;

/// Performs one form POST and returns the body of a 2xx response.
pub trait Transport {
    fn post_form(&mut self, url: &str, body: &str) -> Result<Vec<u8>, ApiError>;
}

/// Headers the upstream expects from its own web page.
pub fn browser_headers(cfg: &FipeConfig) -> Vec<String> {
    vec![
        format!("User-Agent: {}", cfg.user_agent),
        "Accept: application/json, text/javascript, */*; q=0.01".to_string(),
        format!("Accept-Language: {}", cfg.accept_language),
        "Content-Type: application/x-www-form-urlencoded; charset=UTF-8".to_string(),
        "X-Requested-With: XMLHttpRequest".to_string(),
        format!("Referer: {}/", cfg.base_url),
        "Sec-Fetch-Dest: empty".to_string(),
        "Sec-Fetch-Mode: cors".to_string(),
        "Sec-Fetch-Site: same-origin".to_string(),
    ]
}

/// libcurl transport. One `Easy` handle is reused for the whole run so the
/// in-memory cookie jar carries the upstream session across calls.
pub struct CurlTransport {
    easy: Easy,
    headers: Vec<String>,
}

impl CurlTransport {
    pub fn new(headers: Vec<String>) -> Result<Self, curl::Error> {
        let mut easy = Easy::new();
        // Empty path enables the cookie engine without reading a file.
        easy.cookie_file("")?;
        easy.follow_location(true)?;
        Ok(CurlTransport { easy, headers })
    }
}

impl Transport for CurlTransport {
    fn post_form(&mut self, url: &str, body: &str) -> Result<Vec<u8>, ApiError> {
        let mut list = List::new();
        for h in &self.headers {
            list.append(h)?;
        }

        self.easy.url(url)?;
        self.easy.post(true)?;
        self.easy.post_fields_copy(body.as_bytes())?;
        self.easy.http_headers(list)?;

        let mut data = Vec::new();
        {
            let mut transfer = self.easy.transfer();
            transfer.write_function(|chunk| {
                data.extend_from_slice(chunk);
                Ok(chunk.len())
            })?;
            transfer.perform()?;
        }

        let code = self.easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(ApiError::Http(code));
        }
        tracing::trace!(url, bytes = data.len(), "POST ok");
        Ok(data)
    }
}
