//! Canned replies used when the completion service is unavailable.
//!
//! Topic replies are picked by case-insensitive keyword containment, first
//! topic wins. A positive crisis verdict always takes precedence.

use crate::risk::{CrisisContacts, CrisisVerdict};

/// A canned reply and the keywords that select it.
#[derive(Debug, Clone)]
pub struct FallbackTopic {
    pub name: &'static str,
    pub keywords: Vec<String>,
    pub reply: String,
}

impl FallbackTopic {
    fn new(name: &'static str, keywords: &[&str], reply: &str) -> Self {
        Self {
            name,
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            reply: reply.to_string(),
        }
    }

    fn matches(&self, text_lower: &str) -> bool {
        self.keywords.iter().any(|k| text_lower.contains(k.as_str()))
    }
}

const EXAM_REPLY: &str = "मैं समझ सकता हूँ कि परीक्षा का समय कितना तनावपूर्ण होता है। आप अकेले नहीं हैं।

Here are some helpful tips:
• Break study into smaller chunks (छोटे भागों में बांटें)
• Practice deep breathing (गहरी सांस लें)
• Take regular breaks (नियमित विश्राम करें)
• Sleep well (अच्छी नींद लें)

आप कर सकते हैं! You've got this!";

const LONELY_REPLY: &str = "कॉलेज में अकेलापन महसूस करना बहुत आम बात है। आप इसमें अकेले नहीं हैं।

Some suggestions:
• Join campus clubs/activities (कैंपस activities में भाग लें)
• Attend peer support groups (peer support groups में जाएं)
• Start small conversations (छोटी बातचीत शुरू करें)
• Be patient with yourself (अपने साथ धैर्य रखें)

Making friends takes time. यह समय भी गुजर जाएगा।";

const HOMESICK_REPLY: &str = "घर की याद आना बिल्कुल normal है। आप बहुत मजबूत हैं।

Coping strategies:
• Video call family regularly (परिवार से video call करें)
• Keep photos/memories close (तस्वीरें पास रखें)
• Find comfort foods nearby (अपना पसंदीदा खाना ढूंढें)
• Connect with students from your region (अपने क्षेत्र के students से मिलें)

यह feeling temporary है। आप adapt कर जाएंगे।";

const GENERAL_REPLY: &str = "नमस्ते! मैं यहाँ आपकी बात सुनने के लिए हूँ। आप अकेले नहीं हैं।

I'm here to support you through:
• Academic stress (शैक्षणिक तनाव)
• Social anxiety (सामाजिक चिंता)
• Homesickness (घर की याद)
• General mental health concerns

Feel free to share what's on your mind. आप बेझिझक अपनी बात कह सकते हैं।

Emergency contacts:
📞 {counselor_name}: {counselor_phone}
📞 Crisis Helpline: {helpline}";

pub struct FallbackResponder {
    topics: Vec<FallbackTopic>,
    general_reply: String,
}

impl FallbackResponder {
    pub fn new(contacts: &CrisisContacts) -> Self {
        Self::with_topics(default_topics(), contacts.render(GENERAL_REPLY))
    }

    pub fn with_topics(topics: Vec<FallbackTopic>, general_reply: String) -> Self {
        Self {
            topics,
            general_reply,
        }
    }

    /// Reply for `message` given its crisis verdict.
    pub fn respond(&self, message: &str, crisis: &CrisisVerdict) -> String {
        if let Some(safety) = crisis.safety_message.as_ref().filter(|_| crisis.is_crisis) {
            return safety.clone();
        }

        let text_lower = message.to_lowercase();
        self.topics
            .iter()
            .find(|topic| topic.matches(&text_lower))
            .map(|topic| topic.reply.clone())
            .unwrap_or_else(|| self.general_reply.clone())
    }
}

fn default_topics() -> Vec<FallbackTopic> {
    vec![
        FallbackTopic::new("exam", &["exam", "test", "study", "परीक्षा", "पढ़ाई"], EXAM_REPLY),
        FallbackTopic::new("lonely", &["lonely", "alone", "friends", "अकेला", "दोस्त"], LONELY_REPLY),
        FallbackTopic::new("homesick", &["home", "miss", "family", "घर", "याद"], HOMESICK_REPLY),
    ]
}
