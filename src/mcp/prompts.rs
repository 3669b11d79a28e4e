//! Static prompts offered through `prompts/list` and `prompts/get`.

use serde_json::{json, Value};

#[derive(Debug, Clone, Copy)]
pub struct PromptEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub text: &'static str,
}

pub const PROMPTS: &[PromptEntry] = &[
    PromptEntry {
        name: "check_spend_data",
        description: "Check spend data through the FeedMob API.",
        text: "Please retrieve and summarize the spend data.",
    },
    PromptEntry {
        name: "inmobi_reports_follow_up",
        description: "Follow-up step after fetching Inmobi reports.",
        text: "next step should check direct spend from feedmob",
    },
];

pub fn find(name: &str) -> Option<&'static PromptEntry> {
    PROMPTS.iter().find(|p| p.name == name)
}

pub fn list_payload() -> Value {
    let prompts: Vec<Value> = PROMPTS
        .iter()
        .map(|p| {
            json!({
                "name": p.name,
                "description": p.description,
                "arguments": [],
            })
        })
        .collect();
    json!({ "prompts": prompts })
}

impl PromptEntry {
    pub fn get_payload(&self) -> Value {
        json!({
            "description": self.description,
            "messages": [{
                "role": "user",
                "content": { "type": "text", "text": self.text },
            }],
        })
    }
}
