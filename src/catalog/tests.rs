use super::jamendo::{parse_envelope, tracks_endpoint};
use super::*;
use crate::config::CatalogSettings;

const SAMPLE: &str = r#"{
  "headers": {"status": "success", "code": 0, "error_message": "", "results_count": 2},
  "results": [
    {
      "id": "1532771",
      "name": "Wish You Were Here",
      "duration": 243,
      "artist_id": "7872",
      "artist_name": "Alex Cohen",
      "album_name": "Somewhere",
      "image": "https://usercontent.jamendo.com?type=album&id=1&width=300",
      "audio": "https://prod-1.storage.jamendo.com/?trackid=1532771&format=mp31",
      "shareurl": "https://www.jamendo.com/track/1532771"
    },
    {
      "id": "887202",
      "name": "Epic Song",
      "duration": 97,
      "artist_name": "BoxCat Games",
      "image": "https://usercontent.jamendo.com?type=album&id=2&width=300",
      "audio": "https://prod-1.storage.jamendo.com/?trackid=887202&format=mp31"
    }
  ]
}"#;

#[test]
fn parse_envelope_maps_jamendo_fields_and_ignores_unknown_keys() {
    let tracks = parse_envelope(SAMPLE).unwrap();
    assert_eq!(tracks.len(), 2);

    let first = &tracks[0];
    assert_eq!(first.id, "1532771");
    assert_eq!(first.title, "Wish You Were Here");
    assert_eq!(first.artist, "Alex Cohen");
    assert_eq!(first.duration_secs, 243);
    assert!(first.thumbnail.contains("type=album"));
    assert!(first.audio_url.ends_with("format=mp31"));

    assert_eq!(tracks[1].title, "Epic Song");
    assert_eq!(tracks[1].duration_secs, 97);
}

#[test]
fn parse_envelope_keeps_service_order() {
    let ids: Vec<String> = parse_envelope(SAMPLE)
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(ids, vec!["1532771".to_string(), "887202".to_string()]);
}

#[test]
fn parse_envelope_without_results_is_empty_not_an_error() {
    let tracks = parse_envelope(r#"{"headers": {"status": "success"}, "results": []}"#).unwrap();
    assert!(tracks.is_empty());
}

#[test]
fn parse_envelope_surfaces_failed_header_status() {
    let body = r#"{"headers": {"status": "failed", "code": 5, "error_message": "Your credential is not authorized."}, "results": []}"#;
    match parse_envelope(body) {
        Err(CatalogError::Service(msg)) => assert!(msg.contains("not authorized")),
        other => panic!("expected service error, got {other:?}"),
    }
}

#[test]
fn parse_envelope_rejects_malformed_json() {
    assert!(matches!(
        parse_envelope("<html>oops</html>"),
        Err(CatalogError::Decode(_))
    ));
}

#[test]
fn tracks_endpoint_uses_settings_and_trims_trailing_slash() {
    let settings = CatalogSettings {
        base_url: "https://api.example.test/v3.0/".to_string(),
        client_id: "abc123".to_string(),
        limit: 7,
        ..CatalogSettings::default()
    };
    assert_eq!(
        tracks_endpoint(&settings),
        "https://api.example.test/v3.0/tracks/?client_id=abc123&format=json&limit=7"
    );
}
