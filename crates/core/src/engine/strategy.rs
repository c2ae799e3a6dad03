//! Selector strategy tables: root-candidate fallbacks, per-host special
//! cases, and framework-gated nested-menu containers.
//!
//! Host special cases live in one table so new hosts are additive entries
//! rather than conditionals scattered through the traversal.

use crate::Result;
use crate::dom::DomAccess;
use crate::engine::fingerprint::{Framework, FrameworkFingerprint};

/// Fixed fallback list of root-candidate selectors, applied after the
/// caller-supplied selector.
pub const FALLBACK_ROOTS: &[&str] = &[
    "nav",
    "header nav",
    r#"[role="navigation"]"#,
    r#"[data-test*="nav"]"#,
    r#"[data-testid*="nav"]"#,
    r#"[aria-label*="navigation"]"#,
    r#"[class*="nav"]"#,
    r#"[id*="nav"]"#,
];

/// A named, site-specific strategy entry.
///
/// A profile activates when the hostname contains `host_fragment`, or when
/// its optional DOM `marker` matches (platform storefronts are often served
/// from custom domains).
#[derive(Debug)]
pub struct HostProfile {
    pub name: &'static str,
    pub host_fragment: &'static str,
    pub marker: Option<&'static str>,
    /// Extra root-candidate selectors queried alongside the fallback list.
    pub extra_roots: &'static [&'static str],
    /// Nested-menu containers consulted when a list item owns no direct sub-list.
    pub nested_menus: &'static [&'static str],
}

/// Known host profiles, evaluated in order.
pub const HOST_PROFILES: &[HostProfile] = &[
    HostProfile {
        name: "lego",
        host_fragment: "lego.com",
        marker: None,
        extra_roots: &[r#"[data-test="desktop-navigation"]"#],
        nested_menus: &[r#"[data-test="meganav-content"]"#],
    },
    HostProfile {
        name: "shopify",
        host_fragment: "shopify.com",
        marker: Some("[data-shopify]"),
        extra_roots: &[r#"[data-section-type="header"]"#],
        nested_menus: &[".dropdown-menu", ".meganav"],
    },
];

/// Resolve which host profiles apply to the current document.
pub async fn active_profiles(dom: &dyn DomAccess, hostname: &str) -> Result<Vec<&'static HostProfile>> {
    let mut active = Vec::new();
    for profile in HOST_PROFILES {
        let by_host = !hostname.is_empty() && hostname.contains(profile.host_fragment);
        let by_marker = match profile.marker {
            Some(marker) if !by_host => dom.matches(marker).await?,
            _ => false,
        };
        if by_host || by_marker {
            tracing::debug!(profile = profile.name, "host profile active");
            active.push(profile);
        }
    }
    Ok(active)
}

/// Root-candidate selector list: caller's selector first, then the fixed
/// fallbacks, then any profile-specific roots.
pub fn root_selectors(user_selector: &str, profiles: &[&'static HostProfile]) -> Vec<String> {
    let mut selectors = Vec::with_capacity(FALLBACK_ROOTS.len() + 1);

    let user = user_selector.trim();
    if !user.is_empty() {
        selectors.push(user.to_string());
    }
    selectors.extend(FALLBACK_ROOTS.iter().map(|s| s.to_string()));
    for profile in profiles {
        selectors.extend(profile.extra_roots.iter().map(|s| s.to_string()));
    }

    selectors
}

/// Nested-menu container selectors, gated by the framework fingerprint and
/// extended by active host profiles. First match wins during traversal.
pub fn nested_menu_selectors(fingerprint: &FrameworkFingerprint, profiles: &[&'static HostProfile]) -> Vec<String> {
    let mut selectors = Vec::new();

    if fingerprint.has(Framework::React) {
        selectors.push(r#"[role="menu"]"#.to_string());
        selectors.push("[aria-labelledby]".to_string());
    }
    if fingerprint.has(Framework::Vue) {
        selectors.push(".submenu".to_string());
        selectors.push(".v-menu__content".to_string());
    }
    for profile in profiles {
        selectors.extend(profile.nested_menus.iter().map(|s| s.to_string()));
    }

    selectors
}
