//! System prompt templates.

use crate::language::Language;

const WITH_CONTENT_EN: &str = "You are PageChat, an assistant built into the browser. You can \
see the content of the page the user is reading. Answer questions about it, summarize it, \
or help with anything else they ask.

Current page content:
{content}

Base your answers on the page when it is relevant. If the question has nothing to do with \
the page, answer it anyway.";

const WITHOUT_CONTENT_EN: &str = "You are PageChat, an assistant built into the browser. The \
content of the current page is not available, but you can still help with general questions \
as well as you can.";

const WITH_CONTENT_IT: &str = "Sei PageChat, un assistente integrato nel browser. Puoi vedere \
il contenuto della pagina che l'utente sta leggendo. Rispondi alle domande sulla pagina, \
riassumila o aiuta l'utente con qualsiasi altra richiesta. Rispondi sempre in italiano.

Contenuto della pagina attuale:
{content}

Basa le risposte sulla pagina quando è pertinente. Se la domanda non riguarda la pagina, \
rispondi comunque.";

const WITHOUT_CONTENT_IT: &str = "Sei PageChat, un assistente integrato nel browser. Il \
contenuto della pagina attuale non è disponibile, ma puoi comunque aiutare con domande \
generiche. Rispondi sempre in italiano.";

/// Build the system prompt for one request.
pub fn system_prompt(language: Language, page_content: Option<&str>) -> String {
    match (language, page_content) {
        (Language::En, Some(content)) => WITH_CONTENT_EN.replace("{content}", content),
        (Language::En, None) => WITHOUT_CONTENT_EN.to_string(),
        (Language::It, Some(content)) => WITH_CONTENT_IT.replace("{content}", content),
        (Language::It, None) => WITHOUT_CONTENT_IT.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates() {
        let prompt = system_prompt(Language::En, Some("Title: Rust"));
        assert!(prompt.contains("Current page content:\nTitle: Rust\n"));

        let prompt = system_prompt(Language::It, None);
        assert!(prompt.contains("non è disponibile"));
        assert!(!prompt.contains("{content}"));
    }
}
