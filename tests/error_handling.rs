use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;

use chatcanon::{
    CanonicalKind, ChatCanonConfig, ConfigLoadError, FetchConfig, HttpContentFetcher, Pipeline,
    PipelineError,
};

/// Serves a single canned HTTP response and returns its base URL.
fn serve_once(status_line: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut buf = [0u8; 2048];
            let _ = stream.read(&mut buf);
            let response = format!(
                "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });
    format!("http://{addr}")
}

fn http_pipeline() -> Pipeline {
    let cfg = FetchConfig {
        timeout_secs: 5,
        connect_timeout_secs: 2,
        ..Default::default()
    };
    Pipeline::new(Arc::new(HttpContentFetcher::new(cfg).unwrap()))
}

fn merged(url: &str) -> String {
    format!(r#"{{"type":"merged","content":"{url}"}}"#)
}

#[test]
fn merged_history_served_over_http() {
    let base = serve_once(
        "HTTP/1.1 200 OK",
        r#"[{"dataid":"1","datadesc":"你好"},{"dataid":"2","datadesc":"在吗"}]"#,
    );
    let out = http_pipeline().normalize(Some(&merged(&format!("{base}/h.json"))), "WxLink");
    assert_eq!(out.text(), "你好\n在吗");
    assert_eq!(out.kind, CanonicalKind::ChatHistory);
}

#[test]
fn server_error_falls_back_to_fixed_entries() {
    let base = serve_once("HTTP/1.1 500 Internal Server Error", "oops");
    let out = http_pipeline().normalize(Some(&merged(&base)), "WxLink");
    assert_eq!(out.text(), chatcanon::FALLBACK_DATADESCS.join("\n"));
    assert_eq!(out.kind, CanonicalKind::ChatHistory);
}

#[test]
fn unreachable_host_falls_back_to_fixed_entries() {
    // Bind then drop so the port is very likely closed.
    let addr = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let out = http_pipeline().normalize(Some(&merged(&format!("http://{addr}/x"))), "WxLink");
    assert_eq!(out.text(), chatcanon::FALLBACK_DATADESCS.join("\n"));
}

#[test]
fn empty_or_invalid_url_never_hits_the_network() {
    for url in ["", "not a url", "ftp://example.com/h.json"] {
        let out = http_pipeline().normalize(Some(&merged(url)), "WxLink");
        assert_eq!(out.kind, CanonicalKind::ChatHistory, "url {url:?}");
        assert_eq!(out.text(), chatcanon::FALLBACK_DATADESCS.join("\n"));
    }
}

#[test]
fn non_array_history_body_uses_default_text() {
    let base = serve_once("HTTP/1.1 200 OK", r#"{"datadesc":"not an array"}"#);
    let out = http_pipeline().normalize(Some(&merged(&base)), "WxLink");
    assert_eq!(out.text(), chatcanon::CHAT_HISTORY_DEFAULT);
}

#[test]
fn malformed_payloads_never_fail() {
    let pipeline = Pipeline::offline();
    let cases = [
        ("{", "WxLink", "WxLink"),
        ("[]", "WxVoice", "Voice"),
        ("null", "WxVoip", "VoiceCall"),
        ("\u{0}", "WxLink", "WxLink"),
    ];
    for (raw, tag, kind) in cases {
        let out = pipeline.normalize(Some(raw), tag);
        assert_eq!(out.kind.as_str(), kind, "{tag} {raw:?}");
        assert!(out.message.is_some());
    }
}

#[test]
fn invalid_yaml_config_is_reported() {
    let err = Pipeline::from_config(&ChatCanonConfig {
        version: "9".into(),
        ..Default::default()
    })
    .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Config(ConfigLoadError::UnsupportedVersion(_))
    ));

    let err = Pipeline::from_config_file("/no/such/chatcanon.yaml").unwrap_err();
    assert!(matches!(err, PipelineError::Config(ConfigLoadError::FileRead(_))));
}
