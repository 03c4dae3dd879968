//! Localized UI text.

use crate::language::Language;

/// Every user-visible string the controller produces, in one language.
pub struct Strings {
    pub extracting: &'static str,
    pub ready: &'static str,
    pub ready_limited: &'static str,
    pub extraction_failed: &'static str,
    pub thinking: &'static str,
    pub credential_saved: &'static str,
    pub cleared: &'static str,
    pub stopped: &'static str,
    pub request_failed: &'static str,
    pub reload_hint: &'static str,
    pub help: &'static str,
    status_heading: &'static str,
    credential_label: &'static str,
    content_label: &'static str,
    connected: &'static str,
    not_set: &'static str,
    loaded: &'static str,
    not_available: &'static str,
    preview_label: &'static str,
    none: &'static str,
}

static ENGLISH: Strings = Strings {
    extracting: "Extracting page content...",
    ready: "Ready",
    ready_limited: "Ready (limited)",
    extraction_failed: "Content extraction failed",
    thinking: "Thinking...",
    credential_saved: "API key saved",
    cleared: "Chat cleared! 🧹",
    stopped: "⏹️ Generation stopped.",
    request_failed: "Sorry, something went wrong while processing your request. Please try again.",
    reload_hint: "⚠️ I couldn't read this page. Try reloading it and opening the panel again. \
                  You can still ask general questions.",
    help: "🤖 **Commands:**\n\n\
           • **/clear** - Clear the conversation\n\
           • **/help** - Show this message\n\
           • **/status** - Show the current status\n\n\
           💡 **Tips:**\n\
           • I can read the page you are looking at\n\
           • Ask about anything on it: summaries, explanations, details\n\
           • General questions work too",
    status_heading: "📊 **Current status:**",
    credential_label: "API key",
    content_label: "Page content",
    connected: "✅ Connected",
    not_set: "❌ Not set",
    loaded: "✅ Loaded",
    not_available: "❌ Not available",
    preview_label: "Content preview",
    none: "None",
};

static ITALIAN: Strings = Strings {
    extracting: "Estrazione del contenuto...",
    ready: "Pronto",
    ready_limited: "Pronto (limitato)",
    extraction_failed: "Estrazione del contenuto non riuscita",
    thinking: "Sto pensando...",
    credential_saved: "Chiave API salvata",
    cleared: "Chat pulita! 🧹",
    stopped: "⏹️ Generazione interrotta.",
    request_failed: "Mi dispiace, qualcosa è andato storto durante l'elaborazione della richiesta. \
                     Riprova.",
    reload_hint: "⚠️ Non riesco a leggere questa pagina. Prova a ricaricarla e a riaprire il \
                  pannello. Puoi comunque farmi domande generiche.",
    help: "🤖 **Comandi:**\n\n\
           • **/pulisci** - Cancella la conversazione\n\
           • **/aiuto** - Mostra questo messaggio\n\
           • **/stato** - Mostra lo stato attuale\n\n\
           💡 **Suggerimenti:**\n\
           • Posso leggere la pagina che stai guardando\n\
           • Chiedimi riassunti, spiegazioni o dettagli\n\
           • Vanno bene anche domande generiche",
    status_heading: "📊 **Stato attuale:**",
    credential_label: "Chiave API",
    content_label: "Contenuto pagina",
    connected: "✅ Collegata",
    not_set: "❌ Non impostata",
    loaded: "✅ Caricato",
    not_available: "❌ Non disponibile",
    preview_label: "Anteprima contenuto",
    none: "Nessuna",
};

impl Strings {
    pub fn for_language(language: Language) -> &'static Strings {
        match language {
            Language::En => &ENGLISH,
            Language::It => &ITALIAN,
        }
    }

    /// Body of the `/status` reply.
    pub fn status_report(&self, has_credential: bool, content: Option<&str>) -> String {
        let credential = if has_credential {
            self.connected
        } else {
            self.not_set
        };
        let (content_line, preview) = match content {
            Some(text) => {
                let preview: String = text.chars().take(100).collect();
                (
                    format!("{} ({} chars)", self.loaded, text.chars().count()),
                    format!("{}...", preview),
                )
            }
            None => (self.not_available.to_string(), self.none.to_string()),
        };

        format!(
            "{}\n\n• {}: {}\n• {}: {}\n\n💡 {}: {}",
            self.status_heading,
            self.credential_label,
            credential,
            self.content_label,
            content_line,
            self.preview_label,
            preview
        )
    }
}
