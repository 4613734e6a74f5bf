use regex::Regex;
use std::sync::LazyLock;

/// First Firefox release that accepts `image-set()` in the cursor property.
pub const FIREFOX_IMAGE_SET_VERSION: u32 = 88;

static FIREFOX_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Firefox/([0-9]+)\.").expect("firefox version pattern is valid"));

/// What the target browser supports when building cursor CSS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrowserProfile {
    /// Use a resolution-aware `image-set()` instead of a single `url()`.
    pub image_set: bool,
    /// Prefix `image-set` with `-webkit-`.
    pub webkit_prefix: bool,
}

impl BrowserProfile {
    pub const LEGACY: BrowserProfile = BrowserProfile {
        image_set: false,
        webkit_prefix: false,
    };

    pub const STANDARD: BrowserProfile = BrowserProfile {
        image_set: true,
        webkit_prefix: false,
    };

    pub const WEBKIT: BrowserProfile = BrowserProfile {
        image_set: true,
        webkit_prefix: true,
    };

    /// Firefox needs version 88 or newer; every other engine is assumed to support `image-set()`.
    /// WebKit and Blink agents carry a `Safari` token and get the prefix.
    pub fn from_user_agent(user_agent: &str) -> Self {
        let image_set = match FIREFOX_VERSION.captures(user_agent) {
            Some(caps) => caps[1]
                .parse::<u32>()
                .map(|v| v >= FIREFOX_IMAGE_SET_VERSION)
                .unwrap_or(false),
            None => true,
        };
        let webkit_prefix = image_set && user_agent.to_lowercase().contains("safari");

        Self {
            image_set,
            webkit_prefix,
        }
    }
}

impl Default for BrowserProfile {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Sample agents for previewing the different CSS forms.
pub const SAMPLE_USER_AGENTS: &[(&str, &str)] = &[
    (
        "Firefox 128",
        "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0",
    ),
    (
        "Firefox 87",
        "Mozilla/5.0 (X11; Linux x86_64; rv:87.0) Gecko/20100101 Firefox/87.0",
    ),
    (
        "Chrome 126",
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
    ),
    (
        "Safari 17",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_5) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Safari/605.1.15",
    ),
];
