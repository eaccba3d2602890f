use super::*;

fn aliases() -> Vec<String> {
    vec!["ghcr.io".to_string()]
}

#[test]
fn test_bare_name() {
    let r = RepositoryRef::from_input("web", "acme", &aliases()).unwrap();
    assert_eq!(r.namespace(), "acme");
    assert_eq!(r.name(), "web");
    assert_eq!(r.path(), "acme/web");
}

#[test]
fn test_namespaced_input() {
    let r = RepositoryRef::from_input("acme/web", "acme", &aliases()).unwrap();
    assert_eq!(r.path(), "acme/web");
}

#[test]
fn test_full_reference_with_host_and_tag() {
    let r = RepositoryRef::from_input("ghcr.io/acme/web:1.2", "acme", &aliases()).unwrap();
    assert_eq!(r.path(), "acme/web");
}

#[test]
fn test_scheme_is_stripped() {
    let r = RepositoryRef::from_input("https://ghcr.io/acme/web", "acme", &aliases()).unwrap();
    assert_eq!(r.path(), "acme/web");
}

#[test]
fn test_extra_path_separator_rejected() {
    let r = RepositoryRef::from_input("acme/web/extra", "acme", &aliases());
    assert!(r.is_err());
}

#[test]
fn test_empty_name_rejected() {
    assert!(RepositoryRef::from_input("", "acme", &aliases()).is_err());
    assert!(RepositoryRef::from_input("acme/", "acme", &aliases()).is_err());
}

#[test]
fn test_new_validates_namespace() {
    assert!(RepositoryRef::new("", "web").is_err());
    assert!(RepositoryRef::new("a/b", "web").is_err());
    assert!(RepositoryRef::new("acme", "web").is_ok());
}

#[test]
fn test_display_is_path() {
    let r = RepositoryRef::new("acme", "web").unwrap();
    assert_eq!(r.to_string(), "acme/web");
}

#[test]
fn test_foreign_namespace_is_not_stripped() {
    // A name under some other org stays a single path segment too many.
    let r = RepositoryRef::from_input("other/web", "acme", &aliases());
    assert!(r.is_err());
}

#[test]
fn test_whitespace_trimmed() {
    let r = RepositoryRef::from_input("  web  ", "acme", &aliases()).unwrap();
    assert_eq!(r.name(), "web");
}
