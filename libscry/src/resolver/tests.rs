use super::*;
use crate::client::Client;

fn test_config() -> Config {
    let mut config = Config::default();
    config.registry.organization = "acme".to_string();
    config
}

fn test_resolver() -> Resolver {
    let client = Client::new("https://ghcr.io", "https://api.github.com").unwrap();
    Resolver::new(client, &test_config(), None).unwrap()
}

fn repo(name: &str) -> RepositoryRef {
    RepositoryRef::new("acme", name).unwrap()
}

#[test]
fn test_resolver_requires_organization() {
    let client = Client::new("https://ghcr.io", "https://api.github.com").unwrap();
    let result = Resolver::new(client, &Config::default(), None);
    assert!(matches!(result, Err(ScryError::Config { .. })));
}

#[test]
fn test_resolver_namespace() {
    assert_eq!(test_resolver().namespace(), "acme");
}

#[test]
fn test_credentials_management() {
    let mut resolver = test_resolver();
    assert!(resolver.credentials.is_none());

    resolver.set_credentials(Credentials::basic("", "token"));
    assert!(resolver.credentials.is_some());

    resolver.clear_credentials();
    assert!(resolver.credentials.is_none());
}

#[test]
fn test_clones_share_cache_tables() {
    let resolver = test_resolver();
    let clone = resolver.clone();

    resolver.cache().tokens.put("acme/web", "tok".to_string());
    assert_eq!(clone.cache().tokens.get("acme/web"), Some("tok".to_string()));
}

#[test]
fn test_invalidate_clears_only_named_repositories() {
    let resolver = test_resolver();
    let cache = resolver.cache();

    cache.tokens.put("acme/web", "t1".to_string());
    cache.tokens.put("acme/db", "t2".to_string());
    cache.tag_lists.put("acme/web", vec!["latest".to_string()]);
    cache.descriptions.put("acme/web:latest", "Web".to_string());
    cache.descriptions.put("acme/web:1.0", "Web old".to_string());
    cache.descriptions.put("acme/db:latest", "Db".to_string());
    cache.listing.put(vec![PackageEntry {
        name: repo("web"),
        description: String::new(),
    }]);

    resolver.invalidate(&[repo("web")]);

    assert!(cache.tokens.get("acme/web").is_none());
    assert!(cache.tag_lists.get("acme/web").is_none());
    assert!(cache.descriptions.get("acme/web:latest").is_none());
    assert!(cache.descriptions.get("acme/web:1.0").is_none());

    // Unrelated repository and the org listing stay cached.
    assert_eq!(cache.tokens.get("acme/db"), Some("t2".to_string()));
    assert_eq!(cache.descriptions.get("acme/db:latest"), Some("Db".to_string()));
    assert!(cache.listing.get().is_some());
}

#[test]
fn test_entries_from_records_maps_and_namespaces() {
    let records = vec![
        PackageRecord {
            name: "web".to_string(),
            description: Some("A web server".to_string()),
        },
        PackageRecord {
            name: "db".to_string(),
            description: None,
        },
    ];

    let entries = entries_from_records("acme", records);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].name.path(), "acme/web");
    assert_eq!(entries[0].description, "A web server");
    assert_eq!(entries[1].name.path(), "acme/db");
    assert!(entries[1].description.is_empty());
}

#[test]
fn test_entries_from_records_skips_invalid_names() {
    let records = vec![
        PackageRecord {
            name: "bad/name".to_string(),
            description: None,
        },
        PackageRecord {
            name: "good".to_string(),
            description: None,
        },
    ];

    let entries = entries_from_records("acme", records);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name.name(), "good");
}

#[tokio::test]
async fn test_enrich_skips_entries_with_descriptions() {
    // An entry that already has a description spawns no chain, so this
    // completes without touching the network.
    let resolver = test_resolver();
    let entries = vec![PackageEntry {
        name: repo("web"),
        description: "already known".to_string(),
    }];

    let enriched = resolver.enrich(entries.clone(), false).await;
    assert_eq!(enriched, entries);
}
