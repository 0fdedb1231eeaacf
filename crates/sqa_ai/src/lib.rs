pub mod config;
pub mod llm;
pub mod ollama;
pub mod report;
pub mod response;

#[cfg(test)]
mod tests {
    use super::ollama::OllamaClient;
    use super::response::{extract_citations, parse_title};

    #[test]
    fn enforces_localhost_only_base_url() {
        assert!(OllamaClient::new("http://127.0.0.1:11434").is_ok());
        assert!(OllamaClient::new("http://127.0.0.1").is_ok());
        assert!(OllamaClient::new("http://127.0.0.1:11434/").is_ok()); // trailing slash is trimmed

        assert!(OllamaClient::new("http://localhost:11434").is_err());
        assert!(OllamaClient::new("http://0.0.0.0:11434").is_err());
        assert!(OllamaClient::new("https://api.example.com").is_err());

        assert!(OllamaClient::new("http://127.0.0.1.evil.com:11434").is_err());
        assert!(OllamaClient::new("http://127.0.0.1@evil.com:11434").is_err());
        assert!(OllamaClient::new("http://127.0.0.1:").is_err());
        assert!(OllamaClient::new("http://127.0.0.1:0").is_err());
        assert!(OllamaClient::new("http://127.0.0.1:99999").is_err());
        assert!(OllamaClient::new("http://127.0.0.1:11434/api").is_err());
    }

    #[test]
    fn title_reply_drops_reasoning() {
        assert_eq!(
            parse_title("<think>\nmaybe this?\n</think>\n  Attention Across Modalities \n"),
            "Attention Across Modalities"
        );
    }

    #[test]
    fn citation_tokens_tolerate_inner_whitespace() {
        let found = extract_citations("x [123 |  Smith et al.  |  2024  |  Citations:  5].");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].author, "Smith et al.");
        assert_eq!(found[0].canonical_key(), "[123 | Smith et al. | 2024 | Citations: 5]");
    }
}
