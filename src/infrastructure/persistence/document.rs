//! Serialized `{ links, lastUpdated }` document shared by the repositories.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Link, LinkStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkDocument {
    #[serde(default)]
    pub links: Vec<Link>,
    pub last_updated: DateTime<Utc>,
}

impl Default for LinkDocument {
    fn default() -> Self {
        Self {
            links: Vec::new(),
            last_updated: Utc::now(),
        }
    }
}

impl LinkDocument {
    pub fn find_by_id(&self, id: &str) -> Option<&Link> {
        self.links.iter().find(|l| l.id() == id)
    }

    pub fn find_by_url(&self, url: &str) -> Option<&Link> {
        self.links.iter().find(|l| l.url() == url)
    }

    pub fn with_status(&self, status: LinkStatus) -> Vec<Link> {
        self.links
            .iter()
            .filter(|l| l.status() == status)
            .cloned()
            .collect()
    }

    /// Replaces the link with the same id in place, or appends it.
    pub fn upsert(&mut self, link: Link) {
        match self.links.iter_mut().find(|l| l.id() == link.id()) {
            Some(slot) => *slot = link,
            None => self.links.push(link),
        }
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.links.len();
        self.links.retain(|l| l.id() != id);
        self.links.len() != before
    }

    pub fn touch(&mut self) {
        self.last_updated = Utc::now();
    }
}
