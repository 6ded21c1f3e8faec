//! Fixtures for install pipeline tests: in-memory tarballs and a mocked
//! npm-style registry

#![allow(dead_code)]

use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;
use std::sync::Once;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

static TRACING: Once = Once::new();

/// Install a subscriber once so `RUST_LOG=debug cargo test` shows pipeline logs
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Build a gzipped npm-style tarball (contents under `package/`)
pub fn build_tarball(files: &[(&str, &str)]) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);

    for (file_path, contents) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(
                &mut header,
                format!("package/{}", file_path),
                contents.as_bytes(),
            )
            .unwrap();
    }

    builder.into_inner().unwrap().finish().unwrap()
}

/// Hex digest the registry would publish for the given bytes
pub fn digest_of(bytes: &[u8]) -> String {
    let mut staged = tempfile::NamedTempFile::new().unwrap();
    staged.write_all(bytes).unwrap();
    brokkr_extensions::verify::file_digest(staged.path()).unwrap()
}

/// Mount manifest and tarball routes for one `(name, version)`
pub async fn mock_registry_package(
    server: &MockServer,
    name: &str,
    version: &str,
    tarball: &[u8],
    shasum: &str,
) {
    let tarball_route = format!("/{}-{}.tgz", name, version);
    let manifest = serde_json::json!({
        "name": name,
        "dist-tags": { "latest": version },
        "versions": {
            version: {
                "name": name,
                "version": version,
                "dist": {
                    "tarball": format!("{}{}", server.uri(), tarball_route),
                    "shasum": shasum,
                }
            }
        }
    });

    Mock::given(method("GET"))
        .and(path(format!("/{}", name)))
        .respond_with(ResponseTemplate::new(200).set_body_json(manifest))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(tarball_route))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(tarball.to_vec()))
        .mount(server)
        .await;
}
