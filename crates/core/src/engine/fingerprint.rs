//! Framework fingerprinting for nested-menu discovery.
//!
//! Probes the rendered document for marker attributes and classes left by
//! the big client-side rendering frameworks. The fingerprint only steers
//! which nested-menu containers are consulted; it never changes the primary
//! root-selector strategy.

use crate::Result;
use crate::dom::DomAccess;

/// Front-end frameworks the engine knows menu conventions for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Framework {
    React,
    Vue,
    Angular,
    Svelte,
    NextJs,
    Gatsby,
}

impl Framework {
    pub fn name(&self) -> &'static str {
        match self {
            Framework::React => "react",
            Framework::Vue => "vue",
            Framework::Angular => "angular",
            Framework::Svelte => "svelte",
            Framework::NextJs => "nextjs",
            Framework::Gatsby => "gatsby",
        }
    }
}

/// Marker selectors per framework. One match is enough to flag a framework.
const MARKERS: &[(Framework, &str)] = &[
    (
        Framework::React,
        "[data-reactroot], [data-reactid], [data-react], .ReactModal__Overlay",
    ),
    (Framework::Vue, "[data-v-app], [data-vue], .v-application"),
    (Framework::Angular, "[ng-app], [data-ng], .ng-scope"),
    (Framework::Svelte, "[data-svelte]"),
    (Framework::NextJs, "[data-nextjs], #__next"),
    (Framework::Gatsby, "[data-gatsby], #___gatsby"),
];

/// Set of frameworks detected in a document.
#[derive(Debug, Clone, Default)]
pub struct FrameworkFingerprint {
    detected: Vec<Framework>,
}

impl FrameworkFingerprint {
    pub fn has(&self, framework: Framework) -> bool {
        self.detected.contains(&framework)
    }

    pub fn detected(&self) -> &[Framework] {
        &self.detected
    }

    pub fn is_empty(&self) -> bool {
        self.detected.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.detected.iter().map(Framework::name).collect()
    }

    #[cfg(test)]
    pub(crate) fn of(detected: Vec<Framework>) -> Self {
        Self { detected }
    }
}

/// Probe the document for every known framework marker.
pub async fn detect(dom: &dyn DomAccess) -> Result<FrameworkFingerprint> {
    let mut detected = Vec::new();
    for (framework, marker) in MARKERS {
        if dom.matches(marker).await? {
            detected.push(*framework);
        }
    }
    Ok(FrameworkFingerprint { detected })
}
