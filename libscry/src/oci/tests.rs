use super::*;

const MANIFEST_JSON: &str = r#"{
    "schemaVersion": 2,
    "mediaType": "application/vnd.oci.image.manifest.v1+json",
    "config": {
        "mediaType": "application/vnd.oci.image.config.v1+json",
        "size": 1234,
        "digest": "sha256:1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef"
    },
    "layers": []
}"#;

fn index_json(entries: &[(&str, &str, &str)]) -> String {
    let manifests: Vec<String> = entries
        .iter()
        .map(|(os, arch, digest)| {
            format!(
                r#"{{
                    "mediaType": "application/vnd.oci.image.manifest.v1+json",
                    "size": 1234,
                    "digest": "{digest}",
                    "platform": {{ "architecture": "{arch}", "os": "{os}" }}
                }}"#
            )
        })
        .collect();
    format!(
        r#"{{
            "schemaVersion": 2,
            "mediaType": "application/vnd.oci.image.index.v1+json",
            "manifests": [{}]
        }}"#,
        manifests.join(",")
    )
}

const ARM_DIGEST: &str =
    "sha256:aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
const AMD64_DIGEST: &str =
    "sha256:bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

#[test]
fn test_parse_manifest() {
    let doc = ManifestOrIndex::from_bytes(MANIFEST_JSON.as_bytes()).unwrap();
    assert!(matches!(doc, ManifestOrIndex::Manifest(_)));
    assert_eq!(
        doc.config_digest().unwrap(),
        "sha256:1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef"
    );
}

#[test]
fn test_parse_index() {
    let json = index_json(&[("linux", "arm64", ARM_DIGEST)]);
    let doc = ManifestOrIndex::from_bytes(json.as_bytes()).unwrap();
    assert!(matches!(doc, ManifestOrIndex::Index(_)));
    assert!(doc.config_digest().is_none());
}

#[test]
fn test_parse_docker_manifest_list_media_type() {
    let json = index_json(&[("linux", "amd64", AMD64_DIGEST)]).replace(
        "application/vnd.oci.image.index.v1+json",
        "application/vnd.docker.distribution.manifest.list.v2+json",
    );
    let doc = ManifestOrIndex::from_bytes(json.as_bytes()).unwrap();
    assert!(matches!(doc, ManifestOrIndex::Index(_)));
}

#[test]
fn test_parse_without_media_type_infers_from_structure() {
    let json = index_json(&[("linux", "amd64", AMD64_DIGEST)])
        .replace("\"mediaType\": \"application/vnd.oci.image.index.v1+json\",", "");
    let doc = ManifestOrIndex::from_bytes(json.as_bytes()).unwrap();
    assert!(matches!(doc, ManifestOrIndex::Index(_)));
}

#[test]
fn test_parse_garbage_fails() {
    assert!(ManifestOrIndex::from_bytes(b"not json").is_err());
    assert!(ManifestOrIndex::from_bytes(b"{}").is_err());
}

#[test]
fn test_select_platform_exact_match() {
    let json = index_json(&[("linux", "arm", ARM_DIGEST), ("linux", "amd64", AMD64_DIGEST)]);
    let doc = ManifestOrIndex::from_bytes(json.as_bytes()).unwrap();
    let index = doc.as_index().unwrap();

    let selected = select_platform(index, "linux", "amd64").unwrap();
    assert_eq!(selected.digest().to_string(), AMD64_DIGEST);
}

#[test]
fn test_select_platform_falls_back_to_first_entry() {
    let json = index_json(&[("linux", "arm", ARM_DIGEST), ("linux", "s390x", AMD64_DIGEST)]);
    let doc = ManifestOrIndex::from_bytes(json.as_bytes()).unwrap();
    let index = doc.as_index().unwrap();

    let selected = select_platform(index, "linux", "amd64").unwrap();
    assert_eq!(selected.digest().to_string(), ARM_DIGEST);
}

#[test]
fn test_select_platform_empty_index() {
    let json = index_json(&[]);
    let doc = ManifestOrIndex::from_bytes(json.as_bytes()).unwrap();
    let index = doc.as_index().unwrap();

    assert!(select_platform(index, "linux", "amd64").is_none());
}

#[test]
fn test_description_from_config() {
    let blob = format!(
        r#"{{
            "architecture": "amd64",
            "os": "linux",
            "config": {{
                "Labels": {{ "{DESCRIPTION_LABEL}": "  Acme web server  " }}
            }},
            "rootfs": {{ "type": "layers", "diff_ids": [] }}
        }}"#
    );
    assert_eq!(
        description_from_config(blob.as_bytes()),
        Some("Acme web server".to_string())
    );
}

#[test]
fn test_description_absent_label_is_empty() {
    let blob = r#"{
        "architecture": "amd64",
        "os": "linux",
        "config": { "Labels": { "maintainer": "acme" } },
        "rootfs": { "type": "layers", "diff_ids": [] }
    }"#;
    assert_eq!(description_from_config(blob.as_bytes()), Some(String::new()));
}

#[test]
fn test_description_without_config_section() {
    let blob = r#"{
        "architecture": "amd64",
        "os": "linux",
        "rootfs": { "type": "layers", "diff_ids": [] }
    }"#;
    assert_eq!(description_from_config(blob.as_bytes()), Some(String::new()));
}

#[test]
fn test_description_unparsable_blob() {
    assert!(description_from_config(b"junk").is_none());
}
