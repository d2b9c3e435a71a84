//! End-to-end media resolution against a local axum server.

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::json;
use tempfile::TempDir;
use tokio::net::TcpListener;

use chatseg_core::media::{MediaFetcher, MediaStore};
use chatseg_infra::context::MediaContext;
use chatseg_infra::media::HttpMediaFetcher;
use chatseg_types::config::ChatsegConfig;
use chatseg_types::error::SegmentError;
use chatseg_types::resource::ResourceRef;
use chatseg_types::segment::{Image, Node, Nodes, Plain, Segment, Video};

const PNG: &[u8] = b"\x89PNG fake image";
const MP4: &[u8] = b"fake video";

async fn serve_media() -> anyhow::Result<SocketAddr> {
    let app = Router::new()
        .route("/a.png", get(|| async { PNG }))
        .route("/v.mp4", get(|| async { MP4 }))
        .route(
            "/slow.png",
            get(|| async {
                tokio::time::sleep(Duration::from_millis(50)).await;
                PNG
            }),
        );

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(addr)
}

fn context(tmp: &TempDir, callback: Option<&str>) -> anyhow::Result<MediaContext> {
    let config = ChatsegConfig {
        callback_api_base: callback.map(str::to_string),
        download_timeout_secs: 5,
        ..ChatsegConfig::default()
    };
    Ok(MediaContext::from_config(&config, tmp.path())?)
}

#[tokio::test]
async fn fetcher_streams_body_to_disk() -> anyhow::Result<()> {
    let addr = serve_media().await?;
    let tmp = TempDir::new()?;
    let dest = tmp.path().join("a.png");

    let fetcher = HttpMediaFetcher::new(Duration::from_secs(5))?;
    fetcher.download(&format!("http://{addr}/a.png"), &dest).await?;

    assert_eq!(tokio::fs::read(&dest).await?, PNG);
    Ok(())
}

#[tokio::test]
async fn not_found_is_network_error_and_leaves_nothing() -> anyhow::Result<()> {
    let addr = serve_media().await?;
    let tmp = TempDir::new()?;
    let dest = tmp.path().join("gone.png");

    let fetcher = HttpMediaFetcher::new(Duration::from_secs(5))?;
    let err = fetcher
        .download(&format!("http://{addr}/gone.png"), &dest)
        .await
        .unwrap_err();

    assert!(matches!(err, SegmentError::Network(ref msg) if msg.contains("404")));
    assert!(!dest.exists());
    Ok(())
}

#[tokio::test]
async fn remote_reference_materializes_into_staging() -> anyhow::Result<()> {
    let addr = serve_media().await?;
    let tmp = TempDir::new()?;
    let ctx = context(&tmp, None)?;

    let reference = ResourceRef::remote(format!("http://{addr}/a.png"))?;
    let path = ctx.materializer().resolve_to_local_path(&reference).await?;
    assert!(path.starts_with(tmp.path().join("temp")));
    assert_eq!(ctx.materializer().store().read(&path).await?, PNG);

    let blob = ctx.materializer().resolve_to_base64(&reference).await?;
    assert_eq!(STANDARD.decode(blob)?, PNG);
    Ok(())
}

#[tokio::test]
async fn remote_publish_downloads_then_registers() -> anyhow::Result<()> {
    let addr = serve_media().await?;
    let tmp = TempDir::new()?;
    let ctx = context(&tmp, Some("http://cb:6185/"))?;

    let reference = ResourceRef::remote(format!("http://{addr}/v.mp4"))?;
    let link = ctx
        .publisher()
        .publish(ctx.materializer(), &reference)
        .await?;

    let token = link
        .strip_prefix("http://cb:6185/api/file/")
        .expect("callback link prefix");
    let staged = ctx.registry().take(token).expect("token registered");
    assert_eq!(tokio::fs::read(staged).await?, MP4);
    Ok(())
}

#[tokio::test]
async fn forwarded_bundle_inlines_remote_images_in_order() -> anyhow::Result<()> {
    let addr = serve_media().await?;
    let tmp = TempDir::new()?;
    let ctx = context(&tmp, Some("http://cb"))?;

    let bundle = Nodes::new(vec![
        Node::new(vec![Image::from_url(format!("http://{addr}/slow.png"))?.into()])
            .with_sender(1, "first"),
        Node::new(vec![
            Plain::new("second").into(),
            Image::from_url(format!("http://{addr}/a.png"))?.into(),
        ])
        .with_sender(2, "second"),
    ]);
    let payload = ctx.encoder().to_wire_payload(&Segment::from(bundle)).await?;

    let inline = format!("base64://{}", STANDARD.encode(PNG));
    assert_eq!(payload["messages"][0]["data"]["nickname"], "first");
    assert_eq!(payload["messages"][0]["data"]["content"][0]["data"]["file"], inline.as_str());
    assert_eq!(payload["messages"][1]["data"]["nickname"], "second");
    assert_eq!(
        payload["messages"][1]["data"]["content"],
        json!([
            {"type": "text", "data": {"text": "second"}},
            {"type": "image", "data": {"file": inline}},
        ])
    );
    assert!(ctx.registry().is_empty());
    Ok(())
}

#[tokio::test]
async fn top_level_remote_media_passes_through() -> anyhow::Result<()> {
    let addr = serve_media().await?;
    let tmp = TempDir::new()?;
    let ctx = context(&tmp, Some("http://cb"))?;

    let message: Vec<Segment> = vec![
        Image::from_url(format!("http://{addr}/a.png"))?.into(),
        Video::from_url(format!("http://{addr}/v.mp4"))?.into(),
    ];
    let payloads = ctx.encoder().encode_message(&message).await?;

    assert_eq!(payloads[0]["data"]["file"], format!("http://{addr}/a.png"));
    assert_eq!(payloads[1]["data"]["file"], format!("http://{addr}/v.mp4"));
    assert!(ctx.registry().is_empty());
    Ok(())
}
