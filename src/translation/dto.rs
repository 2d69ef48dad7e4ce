use serde::{Deserialize, Serialize};

/// `text` may be a single string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TextInput {
    One(String),
    Many(Vec<String>),
}

impl TextInput {
    pub fn is_empty(&self) -> bool {
        match self {
            TextInput::One(s) => s.is_empty(),
            TextInput::Many(v) => v.is_empty(),
        }
    }

    pub fn into_vec(self) -> Vec<String> {
        match self {
            TextInput::One(s) => vec![s],
            TextInput::Many(v) => v,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TranslateRequest {
    pub text: Option<TextInput>,
    pub target_lang: Option<String>,
}

impl TranslateRequest {
    pub const DEFAULT_TARGET: &'static str = "en";

    pub fn target(&self) -> &str {
        self.target_lang.as_deref().unwrap_or(Self::DEFAULT_TARGET)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub translated_text: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_accepts_string_or_list() {
        let one: TranslateRequest = serde_json::from_str(r#"{"text": "hello"}"#).unwrap();
        assert_eq!(one.text, Some(TextInput::One("hello".into())));
        assert_eq!(one.target(), "en");

        let many: TranslateRequest =
            serde_json::from_str(r#"{"text": ["a", "b"], "target_lang": "ta"}"#).unwrap();
        assert_eq!(many.target(), "ta");
        assert_eq!(many.text.unwrap().into_vec(), vec!["a", "b"]);
    }

    #[test]
    fn empty_text_is_detected() {
        assert!(TextInput::One(String::new()).is_empty());
        assert!(TextInput::Many(vec![]).is_empty());
        assert!(!TextInput::Many(vec![String::new()]).is_empty());
    }
}
