// Unit tests for the persona instruction builder and session setup

use persona_live::persona::{
    build_system_instruction, default_personas, live_instruction, Persona, PersonaTraits,
    LIVE_RESPONSE_CONSTRAINT,
};
use persona_live::transport::SessionSetup;

#[test]
fn test_instruction_carries_identity_and_trait_values() {
    let instruction = build_system_instruction(
        "Nova",
        "A test pilot",
        Some("Flew everything with wings."),
        PersonaTraits {
            formality: 10,
            warmth: 60,
            humor: 95,
        },
    );

    assert!(instruction.contains("You are Nova."));
    assert!(instruction.contains("TAGLINE: A test pilot"));
    assert!(instruction.contains("Flew everything with wings."));
    assert!(instruction.contains("Formality: 10"));
    assert!(instruction.contains("Warmth: 60"));
    assert!(instruction.contains("Humor: 95"));
}

#[test]
fn test_missing_backstory_falls_back() {
    let instruction =
        build_system_instruction("Nova", "A test pilot", None, PersonaTraits::default());

    assert!(instruction.contains("A mysterious entity."));
}

#[test]
fn test_live_instruction_appends_length_cap() {
    let persona = default_personas().remove(0);
    let instruction = live_instruction(&persona);

    assert!(instruction.starts_with(&persona.system_instruction));
    assert!(instruction.ends_with(LIVE_RESPONSE_CONSTRAINT));
}

#[test]
fn test_created_personas_get_distinct_ids() {
    let first = Persona::create(
        "Echo",
        "Repeats things",
        None,
        PersonaTraits::default(),
        None,
        "gemini-2.5-flash-native-audio-preview-09-2025",
    );
    let second = Persona::create(
        "Echo",
        "Repeats things",
        None,
        PersonaTraits::default(),
        None,
        "gemini-2.5-flash-native-audio-preview-09-2025",
    );

    assert_ne!(first.id, second.id);
    assert!(first.system_instruction.contains("You are Echo."));
}

#[test]
fn test_default_personas_are_complete() {
    let personas = default_personas();
    assert_eq!(personas.len(), 2);

    for persona in &personas {
        assert!(!persona.id.is_empty());
        assert!(!persona.name.is_empty());
        assert!(!persona.system_instruction.is_empty());
        assert!(!persona.response_model.is_empty());
    }

    // Stable ids: chat history and settings reference these.
    assert_eq!(personas[0].id, "default-sage");
    assert_eq!(personas[1].id, "default-spark");
}

#[test]
fn test_session_setup_requests_audio_with_transcription() {
    let persona = default_personas().remove(0);
    let setup = SessionSetup::for_persona(&persona);

    assert_eq!(setup.model, persona.response_model);
    assert_eq!(setup.response_modalities, vec!["AUDIO".to_string()]);
    assert!(setup.system_instruction.contains(&persona.name));
    assert!(setup
        .system_instruction
        .contains("CRITICAL CONSTRAINT: Keep your response STRICTLY under 20 words."));

    let voice = setup.speech_config.as_ref().map(|config| {
        config
            .voice_config
            .prebuilt_voice_config
            .voice_name
            .clone()
    });
    assert_eq!(voice, persona.voice_name);
}

#[test]
fn test_session_setup_omits_voice_when_persona_has_none() {
    let mut persona = default_personas().remove(0);
    persona.voice_name = None;

    let setup = SessionSetup::for_persona(&persona);
    assert!(setup.speech_config.is_none());
}
