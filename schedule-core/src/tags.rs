//! Per-user tag vocabulary.
//!
//! All users' registries share one record (`scheduleTags`): a JSON object
//! mapping user id to that user's ordered tag list. A registry only ever
//! rewrites its own entry.

use std::rc::Rc;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::change::{Change, ChangeFeed};
use crate::constants::TAGS_KEY;
use crate::error::{ScheduleError, ScheduleResult};
use crate::identity::UserId;
use crate::storage::{Storage, read_json};

pub struct TagRegistry {
    storage: Rc<dyn Storage>,
    user: UserId,
    tags: Vec<String>,
    feed: ChangeFeed,
}

impl TagRegistry {
    /// Load `user`'s tags, or `defaults` if none were saved yet (or the record is unreadable).
    pub fn load(storage: Rc<dyn Storage>, user: UserId, defaults: &[String]) -> Self {
        let tags = match read_all(storage.as_ref()).get(user.as_str()) {
            Some(value) => serde_json::from_value::<Vec<String>>(value.clone()).unwrap_or_else(|e| {
                warn!(user = %user, "Ignoring unreadable tag registry: {e}");
                defaults.to_vec()
            }),
            None => defaults.to_vec(),
        };

        TagRegistry {
            storage,
            user,
            tags: dedup(tags),
            feed: ChangeFeed::new(),
        }
    }

    pub fn user(&self) -> &UserId {
        &self.user
    }

    /// Tags in display order.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t == name)
    }

    /// Add a tag. Blank names and exact duplicates are ignored (`Ok(false)`).
    pub fn add(&mut self, name: &str) -> ScheduleResult<bool> {
        let name = name.trim();

        if name.is_empty() || self.contains(name) {
            return Ok(false);
        }

        self.tags.push(name.to_string());

        if let Err(e) = self.save() {
            self.tags.pop();
            return Err(e);
        }

        debug!(user = %self.user, tag = name, "Added tag");
        self.feed.emit(Change::TagsChanged);
        Ok(true)
    }

    /// Write this user's entry, leaving every other user's entry as it was.
    /// Nothing is written if the shared record cannot be read.
    pub fn save(&self) -> ScheduleResult<()> {
        let mut all = read_registries(self.storage.as_ref())?;
        all.insert(self.user.as_str().to_string(), Value::from(self.tags.clone()));

        let content = serde_json::to_string(&Value::Object(all))?;
        self.storage.write(TAGS_KEY, &content)
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&Change) + 'static) {
        self.feed.subscribe(listener);
    }
}

/// The whole shared record. Missing reads as empty; unreadable is an error.
fn read_registries(storage: &dyn Storage) -> ScheduleResult<Map<String, Value>> {
    match read_json(storage, TAGS_KEY)? {
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(ScheduleError::Storage(
            "Tag registries record is not an object".into(),
        )),
        None => Ok(Map::new()),
    }
}

/// Like `read_registries`, but an unreadable record loads as empty.
fn read_all(storage: &dyn Storage) -> Map<String, Value> {
    read_registries(storage).unwrap_or_else(|e| {
        warn!("Could not load tag registries: {e}");
        Map::new()
    })
}

/// Drop repeated names, keeping first occurrences.
fn dedup(tags: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        if !unique.contains(&tag) {
            unique.push(tag);
        }
    }
    unique
}
