//! Social platform publishing for statpost.
//!
//! [`TwitterPlatform`] posts text through the X API v2 with an OAuth 1.0a
//! user-context signature produced by [`OAuth1Signer`].
//!
//! # Example
//!
//! ```no_run
//! use statpost_social::{PublishCredentials, TwitterPlatform};
//! use statpost_interface::SocialPlatform;
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let credentials = PublishCredentials::new("ck", "cs", "at", "ats");
//! let platform = TwitterPlatform::new(
//!     credentials,
//!     TwitterPlatform::DEFAULT_URL,
//!     Duration::from_secs(60),
//! )?;
//! let id = platform.publish("Hello world").await?;
//! println!("posted {}", id);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod credentials;
mod oauth;
mod twitter;

pub use credentials::PublishCredentials;
pub use oauth::{OAuth1Signer, percent_encode};
pub use twitter::TwitterPlatform;
pub use statpost_interface::{PostId, SocialPlatform};
