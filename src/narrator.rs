//! Text-to-speech narration of summaries as inline audio.
//!
//! Speech comes from a Google-Translate-style `translate_tts` endpoint, which
//! accepts at most 100 characters per request. Text is split into chunks on
//! word boundaries and the MP3 segments are concatenated in memory; MP3
//! frames are self-delimiting, so the result plays as one file.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use itertools::Itertools;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Per-request character limit of the TTS endpoint.
pub const MAX_CHUNK_CHARS: usize = 100;

#[derive(Debug, Error)]
pub enum NarrationError {
    #[error("nothing to narrate")]
    EmptyText,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("TTS service answered {status} for chunk {index}")]
    Status {
        status: reqwest::StatusCode,
        index: usize,
    },

    #[error("TTS service returned no audio for chunk {0}")]
    NoAudio(usize),
}

/// Split `text` into pieces of at most `max` characters, breaking between
/// words. A single word longer than `max` is cut wherever it has to be.
pub fn chunk_text(text: &str, max: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if word_len > max {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let pieces = word.chars().chunks(max);
            for piece in &pieces {
                chunks.push(piece.collect());
            }
            continue;
        }
        let needed = if current.is_empty() { word_len } else { current_len + 1 + word_len };
        if needed > max {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Wrap MP3 bytes in an inline `<audio>` player.
pub fn audio_markup(mp3: &[u8]) -> String {
    format!(
        r#"<audio controls><source src="data:audio/mp3;base64,{}" type="audio/mp3"></audio>"#,
        STANDARD.encode(mp3)
    )
}

/// Speech synthesis client. Every call returns its own audio buffer.
#[derive(Debug, Clone)]
pub struct Narrator {
    client: Client,
    base_url: String,
}

impl Narrator {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn chunk_url(&self, chunk: &str, lang: &str, index: usize, total: usize) -> String {
        format!(
            "{}/translate_tts?ie=UTF-8&client=tw-ob&tl={}&q={}&total={}&idx={}&textlen={}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(lang),
            urlencoding::encode(chunk),
            total,
            index,
            chunk.chars().count()
        )
    }

    /// Synthesize `text` and return the MP3 bytes.
    ///
    /// # Errors
    ///
    /// [`NarrationError::EmptyText`] for blank input, otherwise the first
    /// chunk that fails to download.
    #[instrument(level = "info", skip(self, text), fields(chars = text.chars().count()))]
    pub async fn synthesize(&self, text: &str, lang: &str) -> Result<Vec<u8>, NarrationError> {
        let chunks = chunk_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(NarrationError::EmptyText);
        }

        let total = chunks.len();
        let mut audio = Vec::new();
        for (index, chunk) in chunks.iter().enumerate() {
            let response = self
                .client
                .get(self.chunk_url(chunk, lang, index, total))
                .send()
                .await?;
            let status = response.status();
            if !status.is_success() {
                return Err(NarrationError::Status { status, index });
            }
            let bytes = response.bytes().await?;
            if bytes.is_empty() {
                return Err(NarrationError::NoAudio(index));
            }
            debug!(index, bytes = bytes.len(), "Fetched speech chunk");
            audio.extend_from_slice(&bytes);
        }
        Ok(audio)
    }

    /// Narrate `text` as embeddable audio markup.
    ///
    /// Failures are returned as a displayable message instead of markup.
    pub async fn synthesize_speech(&self, text: &str, lang: &str) -> String {
        match self.synthesize(text, lang).await {
            Ok(mp3) => audio_markup(&mp3),
            Err(e) => {
                warn!(error = %e, "Narration failed");
                format!("⚠️ Voice failed: {e}")
            }
        }
    }
}
