// Wire-format tests for the duplex transport messages
//
// The remote speech endpoint speaks camelCase JSON; these tests pin the
// field names and shapes on both directions.

use persona_live::audio::MediaBlob;
use persona_live::persona::default_personas;
use persona_live::transport::{RealtimeInput, ServerMessage, SessionSetup};
use serde_json::json;

#[test]
fn test_realtime_input_serializes_camel_case() {
    let input = RealtimeInput {
        media: MediaBlob {
            data: "AAAA".to_string(),
            mime_type: "audio/pcm;rate=16000".to_string(),
        },
    };

    let value = serde_json::to_value(&input).unwrap();
    assert_eq!(
        value,
        json!({
            "media": {
                "data": "AAAA",
                "mimeType": "audio/pcm;rate=16000"
            }
        })
    );
}

#[test]
fn test_server_message_parses_audio_parts() {
    let raw = json!({
        "serverContent": {
            "modelTurn": {
                "parts": [
                    { "inlineData": { "data": "UlVTVA==", "mimeType": "audio/pcm;rate=24000" } },
                    { }
                ]
            }
        }
    });

    let message: ServerMessage = serde_json::from_value(raw).unwrap();
    let content = message.server_content.unwrap();
    let parts = content.model_turn.unwrap().parts;

    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0].inline_data.as_ref().unwrap().data, "UlVTVA==");
    assert!(parts[1].inline_data.is_none());
}

#[test]
fn test_server_message_parses_transcriptions_and_turn_complete() {
    let raw = json!({
        "serverContent": {
            "inputTranscription": { "text": "hel" },
            "outputTranscription": { "text": "hi " },
            "turnComplete": true
        }
    });

    let message: ServerMessage = serde_json::from_value(raw).unwrap();
    let content = message.server_content.unwrap();

    assert_eq!(content.input_transcription.unwrap().text, "hel");
    assert_eq!(content.output_transcription.unwrap().text, "hi ");
    assert_eq!(content.turn_complete, Some(true));
    assert_eq!(content.interrupted, None);
}

#[test]
fn test_server_message_parses_interrupted() {
    let raw = json!({ "serverContent": { "interrupted": true } });

    let message: ServerMessage = serde_json::from_value(raw).unwrap();
    assert_eq!(message.server_content.unwrap().interrupted, Some(true));
}

#[test]
fn test_unknown_server_message_yields_empty_content() {
    // Keepalives and future message kinds must not be parse errors.
    let message: ServerMessage = serde_json::from_str("{}").unwrap();
    assert!(message.server_content.is_none());

    let message: ServerMessage = serde_json::from_value(json!({ "serverContent": {} })).unwrap();
    let content = message.server_content.unwrap();
    assert!(content.model_turn.is_none());
    assert!(content.turn_complete.is_none());
}

#[test]
fn test_session_setup_wire_shape() {
    let persona = default_personas().remove(0);
    let setup = SessionSetup::for_persona(&persona);

    let value = serde_json::to_value(&setup).unwrap();

    assert_eq!(value["model"], persona.response_model);
    assert_eq!(value["responseModalities"], json!(["AUDIO"]));
    assert_eq!(
        value["speechConfig"]["voiceConfig"]["prebuiltVoiceConfig"]["voiceName"],
        json!("Zephyr")
    );
    assert!(value["systemInstruction"].is_string());
    assert_eq!(value["inputAudioTranscription"], json!({}));
    assert_eq!(value["outputAudioTranscription"], json!({}));
}

#[test]
fn test_session_setup_without_voice_omits_speech_config() {
    let mut persona = default_personas().remove(0);
    persona.voice_name = None;

    let value = serde_json::to_value(SessionSetup::for_persona(&persona)).unwrap();
    assert!(value.get("speechConfig").is_none());
}
