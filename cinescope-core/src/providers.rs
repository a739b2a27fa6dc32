//! Static registry of external embed providers.
//!
//! Providers are third-party hosted players addressed by a stable key. Some of
//! them expose a documented URL template that can be built client-side; the
//! rest require backend resolution. Changing a provider's template is a
//! configuration change, never a logic change.

use serde::{Deserialize, Serialize};

use crate::media::{MediaReference, MediaType};

/// Stable identity and human-readable name for one embed provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderDescriptor {
    /// Stable provider key, e.g. `vidsrc`.
    pub key: String,
    /// Name shown in the server picker.
    pub display_name: String,
}

/// One registered embed provider.
#[derive(Debug, Clone)]
pub struct EmbedProvider {
    /// Stable provider key.
    pub key: String,
    /// Name shown in the server picker.
    pub display_name: String,
    /// Base URL of the provider's embed endpoint, for providers whose URLs
    /// can be templated client-side. `None` forces the backend path.
    pub embed_base: Option<String>,
}

impl EmbedProvider {
    fn new(key: &str, display_name: &str, embed_base: Option<&str>) -> Self {
        Self {
            key: key.to_string(),
            display_name: display_name.to_string(),
            embed_base: embed_base.map(str::to_string),
        }
    }
}

/// Ordered registry of known embed providers.
///
/// Registry order is the canonical provider order everywhere: it decides which
/// key counts as "first available" when a previous selection disappears.
#[derive(Debug, Clone)]
pub struct ProviderCatalog {
    providers: Vec<EmbedProvider>,
}

impl Default for ProviderCatalog {
    fn default() -> Self {
        Self {
            providers: vec![
                EmbedProvider::new("vidsrc", "VidSrc", Some("https://vidsrc.me")),
                EmbedProvider::new("vidcloud", "VidCloud", None),
                EmbedProvider::new("superembed", "SuperEmbed", Some("https://multiembed.mov")),
                EmbedProvider::new("fsapi", "FSAPI", None),
                EmbedProvider::new("curtstream", "CurtStream", None),
                EmbedProvider::new("moviewp", "MovieWP", None),
                EmbedProvider::new("apimdb", "ApiMDB", None),
                EmbedProvider::new("gomo", "GoMo", None),
            ],
        }
    }
}

impl ProviderCatalog {
    /// Creates a catalog from an explicit provider list, in canonical order.
    pub fn new(providers: Vec<EmbedProvider>) -> Self {
        Self { providers }
    }

    /// Registered providers in canonical order.
    pub fn providers(&self) -> &[EmbedProvider] {
        &self.providers
    }

    /// Descriptors for every registered provider, in canonical order.
    pub fn descriptors(&self) -> Vec<ProviderDescriptor> {
        self.providers
            .iter()
            .map(|provider| ProviderDescriptor {
                key: provider.key.clone(),
                display_name: provider.display_name.clone(),
            })
            .collect()
    }

    /// Whether the key names a registered provider.
    pub fn contains(&self, key: &str) -> bool {
        self.providers.iter().any(|provider| provider.key == key)
    }

    /// Canonical position of a provider key, if registered.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.providers.iter().position(|provider| provider.key == key)
    }

    /// Display name for a key. Unknown keys fall back to the capitalized key
    /// so backend-only providers still render something sensible.
    pub fn display_name(&self, key: &str) -> String {
        self.providers
            .iter()
            .find(|provider| provider.key == key)
            .map(|provider| provider.display_name.clone())
            .unwrap_or_else(|| capitalize(key))
    }

    /// Builds an embed URL from the provider's documented template.
    ///
    /// Pure lookup with no side effects. Returns `None` when the key is
    /// unknown, the provider has no template, or the reference does not
    /// satisfy the template's shape (tv without season/episode).
    pub fn embed_url(&self, key: &str, reference: &MediaReference) -> Option<String> {
        let provider = self.providers.iter().find(|provider| provider.key == key)?;
        let base = provider.embed_base.as_deref()?;

        match reference.media_type {
            MediaType::Movie => Some(format!("{base}/embed/movie?tmdb={}", reference.id)),
            MediaType::Tv => {
                let season = reference.season?;
                let episode = reference.episode?;
                Some(format!(
                    "{base}/embed/tv?tmdb={}&season={season}&episode={episode}",
                    reference.id
                ))
            }
        }
    }

    /// Synthesizes provider/URL pairs from templates alone, in canonical
    /// order. Used as the fallback path when backend resolution fails.
    pub fn synthesize(&self, reference: &MediaReference) -> Vec<(String, String)> {
        self.providers
            .iter()
            .filter_map(|provider| {
                self.embed_url(&provider.key, reference)
                    .map(|url| (provider.key.clone(), url))
            })
            .collect()
    }
}

fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movie_template_matches_documented_shape() {
        let catalog = ProviderCatalog::default();
        let reference = MediaReference::movie("550").unwrap();
        assert_eq!(
            catalog.embed_url("vidsrc", &reference).unwrap(),
            "https://vidsrc.me/embed/movie?tmdb=550"
        );
    }

    #[test]
    fn tv_template_includes_season_and_episode() {
        let catalog = ProviderCatalog::default();
        let reference = MediaReference::episode("1399", 1, 1).unwrap();
        assert_eq!(
            catalog.embed_url("vidsrc", &reference).unwrap(),
            "https://vidsrc.me/embed/tv?tmdb=1399&season=1&episode=1"
        );
    }

    #[test]
    fn providers_without_template_return_none() {
        let catalog = ProviderCatalog::default();
        let reference = MediaReference::movie("550").unwrap();
        assert!(catalog.embed_url("vidcloud", &reference).is_none());
    }

    #[test]
    fn unknown_key_returns_none() {
        let catalog = ProviderCatalog::default();
        let reference = MediaReference::movie("550").unwrap();
        assert!(catalog.embed_url("nosuch", &reference).is_none());
    }

    #[test]
    fn synthesis_covers_only_templated_providers() {
        let catalog = ProviderCatalog::default();
        let reference = MediaReference::episode("1399", 2, 5).unwrap();
        let pairs = catalog.synthesize(&reference);

        let keys: Vec<&str> = pairs.iter().map(|(key, _)| key.as_str()).collect();
        assert_eq!(keys, vec!["vidsrc", "superembed"]);
        assert!(pairs.iter().all(|(_, url)| url.contains("season=2")));
    }

    #[test]
    fn display_name_falls_back_to_capitalized_key() {
        let catalog = ProviderCatalog::default();
        assert_eq!(catalog.display_name("superembed"), "SuperEmbed");
        assert_eq!(catalog.display_name("newhost"), "Newhost");
    }
}
