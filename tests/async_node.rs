//! Async node against a mock speech endpoint.

mod common;

use common::{stereo_pattern, wav_i16, SPEECH_PATH};
use mockito::Server;
use openai_tts_node::{AsyncTtsNode, AudioFormat, TtsNodeConfig};

#[tokio::test]
async fn test_async_synthesize_wav() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", SPEECH_PATH)
        .with_status(200)
        .with_header("content-type", "audio/wav")
        .with_body(wav_i16(2, 22_050, &stereo_pattern(100)))
        .create_async()
        .await;

    let config = TtsNodeConfig::new("Hello world")
        .with_url(format!("{}{}", server.url(), SPEECH_PATH))
        .with_response_format(AudioFormat::Wav);
    let audio = AsyncTtsNode::new()
        .unwrap()
        .synthesize(&config)
        .await
        .expect("async synthesis failed");

    mock.assert_async().await;
    assert_eq!(audio.waveform.shape(), &[1, 2, 100]);
    assert_eq!(audio.sample_rate, 22_050);
}

#[tokio::test]
async fn test_async_status_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", SPEECH_PATH)
        .with_status(401)
        .with_body("invalid api key")
        .create_async()
        .await;

    let config = TtsNodeConfig::new("Hello world")
        .with_url(format!("{}{}", server.url(), SPEECH_PATH))
        .with_api_key("sk-wrong");
    let err = AsyncTtsNode::new()
        .unwrap()
        .synthesize(&config)
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert!(err.to_string().contains("invalid api key"));
}
