//! Member directory used for author bylines and member pages

use serde::{Deserialize, Serialize};

use crate::helpers::encode_segment;

/// A team member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub name: String,
    pub icon_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_username: Option<String>,
}

impl Member {
    pub fn twitter_url(&self) -> Option<String> {
        self.twitter_id
            .as_ref()
            .map(|id| format!("https://twitter.com/{}", encode_segment(id)))
    }

    pub fn github_url(&self) -> Option<String> {
        self.github_username
            .as_ref()
            .map(|name| format!("https://github.com/{}", encode_segment(name)))
    }
}

/// Fixed name -> member mapping, in configuration order
#[derive(Debug, Clone, Default)]
pub struct MemberDirectory {
    members: Vec<Member>,
}

impl MemberDirectory {
    pub fn new(members: Vec<Member>) -> Self {
        Self { members }
    }

    /// Look a member up by exact name
    pub fn get(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Member> {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
