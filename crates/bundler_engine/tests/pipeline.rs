use std::collections::BTreeSet;
use std::io::{Cursor, Read};
use std::sync::Arc;
use std::time::Duration;

use bundler_engine::{bundle_images, BundleError, FetchSettings, ReqwestImageFetcher};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zip::ZipArchive;

fn fetcher() -> Arc<ReqwestImageFetcher> {
    Arc::new(ReqwestImageFetcher::new(
        reqwest::Client::new(),
        FetchSettings::default(),
    ))
}

async fn mount_image(server: &MockServer, route: &str, bytes: &'static [u8], delay_ms: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(delay_ms))
                .set_body_bytes(bytes),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn entries_match_urls_regardless_of_completion_order() {
    let server = MockServer::start().await;
    // The slower download finishes last even though it is launched first;
    // only the set of names may be asserted, never an order.
    mount_image(&server, "/a.png", b"bytes of a", 150).await;
    mount_image(&server, "/b.png", b"bytes of b", 0).await;

    let urls = vec![
        format!("{}/a.png", server.uri()),
        format!("{}/b.png", server.uri()),
    ];
    let bytes = bundle_images(fetcher(), &urls).await.unwrap();

    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let names: BTreeSet<String> = (0..archive.len())
        .map(|index| archive.by_index(index).unwrap().name().to_string())
        .collect();
    assert_eq!(
        names,
        BTreeSet::from(["a.png".to_string(), "b.png".to_string()])
    );

    let mut a = Vec::new();
    archive.by_name("a.png").unwrap().read_to_end(&mut a).unwrap();
    assert_eq!(a, b"bytes of a");
    let mut b = Vec::new();
    archive.by_name("b.png").unwrap().read_to_end(&mut b).unwrap();
    assert_eq!(b, b"bytes of b");
}

#[tokio::test]
async fn single_fetch_failure_fails_the_whole_bundle() {
    let server = MockServer::start().await;
    mount_image(&server, "/good.png", b"fine", 0).await;

    let bad_url = "http://127.0.0.1:9/bad.png".to_string();
    let urls = vec![format!("{}/good.png", server.uri()), bad_url.clone()];

    let err = bundle_images(fetcher(), &urls).await.unwrap_err();
    match err {
        BundleError::Fetch { url, .. } => assert_eq!(url, bad_url),
        other => panic!("expected a fetch failure, got {other:?}"),
    }
}

#[tokio::test]
async fn no_urls_produce_an_empty_archive() {
    let bytes = bundle_images(fetcher(), &[]).await.unwrap();
    let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    assert_eq!(archive.len(), 0);
}

#[tokio::test]
async fn many_concurrent_downloads_all_land() {
    let server = MockServer::start().await;
    for index in 0..8 {
        Mock::given(method("GET"))
            .and(path(format!("/img-{index}.png")))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!("payload {index}")))
            .mount(&server)
            .await;
    }

    let urls: Vec<String> = (0..8)
        .map(|index| format!("{}/img-{index}.png", server.uri()))
        .collect();
    let bytes = bundle_images(fetcher(), &urls).await.unwrap();

    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    assert_eq!(archive.len(), 8);
    for index in 0..8 {
        let mut body = Vec::new();
        archive
            .by_name(&format!("img-{index}.png"))
            .unwrap()
            .read_to_end(&mut body)
            .unwrap();
        assert_eq!(body, format!("payload {index}").into_bytes());
    }
}
