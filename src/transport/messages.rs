use serde::{Deserialize, Serialize};

use crate::audio::MediaBlob;
use crate::persona::{self, Persona};

/// Outbound frame carrying one encoded capture block
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealtimeInput {
    pub media: MediaBlob,
}

/// Inbound message from the speech model
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerMessage {
    pub server_content: Option<ServerContent>,
}

/// Tagged content of one inbound message, one field per concern
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerContent {
    /// Synthesized audio for the model's reply
    pub model_turn: Option<ModelTurn>,
    /// The user began speaking over the model; cancel playback
    pub interrupted: Option<bool>,
    /// Partial transcription of the user's speech
    pub input_transcription: Option<TranscriptionDelta>,
    /// Partial transcription of the model's speech
    pub output_transcription: Option<TranscriptionDelta>,
    /// The current turn is complete on both sides
    pub turn_complete: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelTurn {
    pub parts: Vec<ContentPart>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentPart {
    pub inline_data: Option<MediaBlob>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranscriptionDelta {
    pub text: String,
}

/// Connect-time session configuration sent before any audio
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSetup {
    pub model: String,
    pub response_modalities: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speech_config: Option<SpeechConfig>,
    pub system_instruction: String,
    /// Empty object: enables transcription of user audio
    pub input_audio_transcription: TranscriptionEnabled,
    /// Empty object: enables transcription of model audio
    pub output_audio_transcription: TranscriptionEnabled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechConfig {
    pub voice_config: VoiceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceConfig {
    pub prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrebuiltVoiceConfig {
    pub voice_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranscriptionEnabled {}

impl SessionSetup {
    /// Build the connect configuration for a voice session with this persona
    ///
    /// Audio-only responses, the persona's voice if it names one, its system
    /// instruction with the response length cap appended, and transcription
    /// enabled in both directions.
    pub fn for_persona(persona: &Persona) -> Self {
        Self {
            model: persona.response_model.clone(),
            response_modalities: vec!["AUDIO".to_string()],
            speech_config: persona.voice_name.as_ref().map(|voice| SpeechConfig {
                voice_config: VoiceConfig {
                    prebuilt_voice_config: PrebuiltVoiceConfig {
                        voice_name: voice.clone(),
                    },
                },
            }),
            system_instruction: persona::live_instruction(persona),
            input_audio_transcription: TranscriptionEnabled {},
            output_audio_transcription: TranscriptionEnabled {},
        }
    }
}
