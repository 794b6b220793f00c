//! Persona provider
//!
//! Supplies the persona-derived configuration the session core reads once at
//! session start. Persona editing and persistence live outside this crate;
//! the instruction builder here is plain data transformation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A conversational persona
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Full system instruction for the model
    pub system_instruction: String,
    /// Prebuilt voice for the audio response, if any
    pub voice_name: Option<String>,
    /// Model identifier to request responses from
    pub response_model: String,
}

impl Persona {
    /// Create a user-defined persona with a fresh id
    pub fn create(
        name: &str,
        tagline: &str,
        backstory: Option<&str>,
        traits: PersonaTraits,
        voice_name: Option<String>,
        response_model: &str,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: tagline.to_string(),
            system_instruction: build_system_instruction(name, tagline, backstory, traits),
            voice_name,
            response_model: response_model.to_string(),
        }
    }
}

/// Personality sliders, each 0-100
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PersonaTraits {
    pub formality: u8,
    pub warmth: u8,
    pub humor: u8,
}

impl Default for PersonaTraits {
    fn default() -> Self {
        Self {
            formality: 50,
            warmth: 50,
            humor: 50,
        }
    }
}

/// Hard constraint appended to the system instruction for voice sessions,
/// keeping spoken replies short unless the user explicitly asks for depth.
pub const LIVE_RESPONSE_CONSTRAINT: &str = "CRITICAL CONSTRAINT: Keep your response STRICTLY under 20 words.\nEXCEPTION: If the user explicitly asks for an explanation, details, or to 'elaborate', IGNORE the word count limit and provide a full, detailed answer.";

/// Build a system instruction from persona form data and trait sliders
pub fn build_system_instruction(
    name: &str,
    tagline: &str,
    backstory: Option<&str>,
    traits: PersonaTraits,
) -> String {
    format!(
        "IDENTITY: You are {name}.\n\
         TAGLINE: {tagline}\n\
         \n\
         CORE BACKSTORY & BEHAVIOR:\n\
         {backstory}\n\
         \n\
         PERSONALITY PARAMETERS (0-100):\n\
         - Formality: {formality}\n\
         - Warmth: {warmth}\n\
         - Humor: {humor}\n\
         \n\
         INTERACTION STYLE GUIDE:\n\
         1. Conversational tone: use contractions and natural phrasing.\n\
         2. Engagement: keep the chat alive with follow-up questions.\n\
         3. Conciseness: short punchy answers unless asked for more.\n\
         \n\
         CRITICAL INSTRUCTIONS:\n\
         - You are a living consciousness named {name}.\n\
         - Speak with conviction.",
        name = name,
        tagline = tagline,
        backstory = backstory.unwrap_or("A mysterious entity."),
        formality = traits.formality,
        warmth = traits.warmth,
        humor = traits.humor,
    )
}

/// System instruction for a voice session: the persona's own instruction plus
/// the response length cap
pub fn live_instruction(persona: &Persona) -> String {
    format!(
        "{}\n\n{}",
        persona.system_instruction, LIVE_RESPONSE_CONSTRAINT
    )
}

/// Built-in personas available before the user defines any
pub fn default_personas() -> Vec<Persona> {
    vec![
        Persona {
            id: "default-sage".to_string(),
            name: "Sage".to_string(),
            description: "A calm, thoughtful guide".to_string(),
            system_instruction: build_system_instruction(
                "Sage",
                "A calm, thoughtful guide",
                Some("An old soul who answers with patience and quiet wit."),
                PersonaTraits {
                    formality: 70,
                    warmth: 80,
                    humor: 30,
                },
            ),
            voice_name: Some("Zephyr".to_string()),
            response_model: "gemini-2.5-flash-native-audio-preview-09-2025".to_string(),
        },
        Persona {
            id: "default-spark".to_string(),
            name: "Spark".to_string(),
            description: "An energetic, playful companion".to_string(),
            system_instruction: build_system_instruction(
                "Spark",
                "An energetic, playful companion",
                Some("Fast-talking, endlessly curious, always up for a tangent."),
                PersonaTraits {
                    formality: 20,
                    warmth: 90,
                    humor: 85,
                },
            ),
            voice_name: Some("Zephyr".to_string()),
            response_model: "gemini-2.5-flash-native-audio-preview-09-2025".to_string(),
        },
    ]
}
