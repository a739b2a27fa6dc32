//! Property tests for the pure parts of source resolution.

use cinescope_core::media::MediaReference;
use cinescope_core::providers::ProviderCatalog;
use cinescope_core::resolver::SourceMap;
use proptest::prelude::*;

fn arbitrary_reference() -> impl Strategy<Value = MediaReference> {
    let movie = (1u64..=999_999).prop_map(|id| MediaReference::movie(id.to_string()).unwrap());
    let episode = (1u64..=999_999, 1u32..=40, 1u32..=60)
        .prop_map(|(id, season, episode)| {
            MediaReference::episode(id.to_string(), season, episode).unwrap()
        });
    prop_oneof![movie, episode]
}

proptest! {
    /// Synthesizing the same reference twice yields identical pairs.
    #[test]
    fn synthesis_is_deterministic(reference in arbitrary_reference()) {
        let catalog = ProviderCatalog::default();
        prop_assert_eq!(catalog.synthesize(&reference), catalog.synthesize(&reference));
    }

    /// Every synthesized URL embeds the reference's identity fields.
    #[test]
    fn synthesized_urls_carry_the_identity(reference in arbitrary_reference()) {
        let catalog = ProviderCatalog::default();
        for (_, url) in catalog.synthesize(&reference) {
            let id_param = format!("tmdb={}", reference.id);
            prop_assert!(url.contains(&id_param), "missing {} in {}", id_param, url);
            if let Some(season) = reference.season {
                let season_param = format!("season={season}");
                prop_assert!(url.contains(&season_param), "missing {} in {}", season_param, url);
            }
        }
    }

    /// Canonical ordering is independent of payload order for known keys.
    #[test]
    fn canonical_order_ignores_payload_order(shuffle in proptest::sample::subsequence(
        vec!["gomo", "superembed", "fsapi", "vidsrc", "vidcloud"], 1..=5,
    )) {
        let catalog = ProviderCatalog::default();
        let forwards: Vec<(String, String)> = shuffle
            .iter()
            .map(|key| (key.to_string(), format!("https://{key}.example/x")))
            .collect();
        let mut backwards = forwards.clone();
        backwards.reverse();

        let a = SourceMap::canonical(&catalog, forwards);
        let b = SourceMap::canonical(&catalog, backwards);
        prop_assert_eq!(
            a.keys().collect::<Vec<_>>(),
            b.keys().collect::<Vec<_>>()
        );
    }

    /// Duplicate keys keep their first URL.
    #[test]
    fn duplicate_keys_keep_first_url(url_a in "[a-z]{1,12}", url_b in "[a-z]{1,12}") {
        let catalog = ProviderCatalog::default();
        let map = SourceMap::canonical(&catalog, vec![
            ("vidsrc".to_string(), format!("https://example.com/{url_a}")),
            ("vidsrc".to_string(), format!("https://example.com/{url_b}")),
        ]);
        prop_assert_eq!(map.len(), 1);
        let expected = format!("https://example.com/{url_a}");
        prop_assert_eq!(map.url_for("vidsrc"), Some(expected.as_str()));
    }
}
