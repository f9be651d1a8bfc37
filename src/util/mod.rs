//! Text measurement and URL checks shared by the gateway and the UI.
//!
//! ```
//! use horizon::util::{display_width, validate_source_url};
//!
//! assert_eq!(display_width("Horizon"), 7);
//! assert!(validate_source_url("https://example.com/story").is_ok());
//! assert!(validate_source_url("file:///etc/passwd").is_err());
//! ```

mod text;
mod url_validator;

pub use text::{display_width, strip_control_chars, truncate_to_width};
pub use url_validator::{
    is_loopback_host, validate_api_base, validate_source_url, UrlValidationError,
};
