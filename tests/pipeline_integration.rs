use std::io::Write;

use chatcanon::{
    CanonicalKind, ChatCanonConfig, Pipeline, RawRecord, FALLBACK_DATADESCS, PICTURE_TEXT,
    STICKER_TEXT, VOICE_DEFAULT,
};
use tempfile::NamedTempFile;

const EXPORT: &str = r#"
{"sender":"wxid_1","message":"{\"type\":\"miniprogram\",\"contentXml\":\"<msg><title><![CDATA[每日步数]]></title></msg>\"}","type":"WxLink","chat_time":"2024-05-01T09:00:00Z"}
{"sender":"wxid_1","message":"{\"type\":\"merged\",\"content\":\"https://cdn.example.com/history/7.json\"}","type":"WxLink"}
{"sender":"wxid_2","message":"{\"type\":\"link\",\"title\":\"向商家付款 12.00\"}","type":"WxLink"}
{"sender":"wxid_2","message":"{\"type\":\"link\",\"title\":\"秋冬进补\",\"desc\":\"三款汤\"}","type":"WxLink"}
{"sender":"wxid_3","message":"{\"type\":\"content_sharing\"}","type":"WxLink"}
{"sender":"wxid_3","message":"{\"text\":\"\"}","type":"WxVoice"}
{"sender":"wxid_4","message":"{\"duration\":59}","type":"WxVoip"}
{"sender":"wxid_4","message":null,"type":"WxPic"}
{"sender":"wxid_5","message":"cdn://sticker","type":"WxCustomPic"}
{"sender":"wxid_5","message":"早","type":"Text"}
"#;

fn parse_export() -> Vec<RawRecord> {
    EXPORT
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).expect("valid export line"))
        .collect()
}

fn config_file(yaml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    file
}

#[test]
fn offline_export_normalizes_every_record() {
    let file = config_file("version: \"1.0\"\nfetch:\n  enabled: false\n");
    let pipeline = Pipeline::from_config_file(file.path()).unwrap();

    let messages = pipeline.ingest_batch(parse_export());
    let got: Vec<(String, String)> = messages
        .iter()
        .map(|m| {
            (
                m.canonical_message().unwrap_or_default().to_string(),
                m.canonical_type().map(|k| k.to_string()).unwrap_or_default(),
            )
        })
        .collect();

    let expected = vec![
        ("每日步数".to_string(), "MiniProgram"),
        (FALLBACK_DATADESCS.join("\n"), "ChatHistory"),
        ("向商家付款的链接".to_string(), "PaymentLink"),
        ("秋冬进补\n三款汤".to_string(), "LinkShare"),
        ("内容分享".to_string(), "ContentSharing"),
        (VOICE_DEFAULT.to_string(), "Voice"),
        ("这是一段时长为0分钟59秒的通话".to_string(), "VoiceCall"),
        (PICTURE_TEXT.to_string(), "Picture"),
        (STICKER_TEXT.to_string(), "Sticker"),
        ("早".to_string(), "Text"),
    ];
    let expected: Vec<(String, String)> = expected
        .into_iter()
        .map(|(text, kind)| (text, kind.to_string()))
        .collect();

    assert_eq!(got, expected);
    assert!(messages.iter().all(|m| m.is_processed()));
}

#[test]
fn parallel_config_matches_sequential_output() {
    let parallel = config_file("fetch:\n  enabled: false\npipeline:\n  parallel: true\n");
    let sequential = config_file("fetch:\n  enabled: false\n");

    let a = Pipeline::from_config_file(parallel.path())
        .unwrap()
        .ingest_batch(parse_export());
    let b = Pipeline::from_config_file(sequential.path())
        .unwrap()
        .ingest_batch(parse_export());
    assert_eq!(a, b);
}

#[test]
fn normalized_messages_serialize_for_persistence() {
    let pipeline = Pipeline::offline();
    let messages = pipeline.ingest_batch(parse_export());

    let json = serde_json::to_value(&messages[0]).unwrap();
    assert_eq!(json["sender"], "wxid_1");
    assert_eq!(json["raw_type"], "WxLink");
    assert_eq!(json["canonical_message"], "每日步数");
    assert_eq!(json["canonical_type"], "MiniProgram");
    assert_eq!(json["chat_time"], "2024-05-01T09:00:00Z");

    let passthrough = serde_json::to_value(&messages[9]).unwrap();
    assert_eq!(passthrough["canonical_type"], "Text");
}

#[test]
fn default_config_enables_http_fetcher() {
    let cfg = ChatCanonConfig::default();
    let pipeline = Pipeline::from_config(&cfg).unwrap();
    // An empty URL is rejected before any request, so this stays offline.
    let out = pipeline.normalize(Some(r#"{"type":"merged","content":""}"#), "WxLink");
    assert_eq!(out.kind, CanonicalKind::ChatHistory);
    assert_eq!(out.text(), FALLBACK_DATADESCS.join("\n"));
}
