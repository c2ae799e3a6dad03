pub mod browser;
pub mod bundle;
pub mod digest;
pub mod dom;
pub mod engine;
pub mod error;
pub mod fetch;
pub mod links;
pub mod metadata;
pub mod orchestrate;
pub mod overlay;
pub mod render;
pub mod request;
pub mod tree;

pub use browser::{BrowserSession, LiveDom, SessionConfig};
pub use bundle::{ARCHIVE_NAME, ArtifactStore, Bundle, bundle_digests};
pub use digest::{PageDigest, digest_batch, digest_html, digest_url, parse_url_list, sanitize_filename};
#[doc(hidden)]
pub use dom::{DomAccess, NodeFacts, NodeId, StaticDom};
pub use engine::extract_navigation;
pub use engine::fingerprint::{Framework, FrameworkFingerprint};
pub use engine::retry::{AttemptOutcome, RetryPolicy, RetryState};
pub use error::{LlmstxtError, Result};
pub use fetch::FetchConfig;
pub use fetch::{fetch_file, fetch_stdin, fetch_url};
pub use links::{LinkEntry, convert_link_text, extract_link_entries, render_link_list};
pub use metadata::{NO_DESCRIPTION, NO_TITLE, PageInfo, fetch_page_info, page_info};
pub use orchestrate::{ExtractionOutcome, Orchestrator, compose_document};
pub use overlay::DismissOutcome;
pub use render::{TITLE_STOPLIST, render_tree};
pub use request::{DEFAULT_CLICKABLE_SELECTOR, ExtractionRequest};
pub use tree::NavNode;
