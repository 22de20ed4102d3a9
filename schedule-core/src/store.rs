//! Per-user event collection.
//!
//! Every user's events live interleaved in one shared record
//! (`scheduleEvents`, a JSON array). A store only loads the entries owned by
//! its user, and on every mutation it re-reads the record, swaps out its own
//! user's entries and writes the result back. Other users' entries are
//! carried through as raw JSON so they survive untouched.

use std::rc::Rc;

use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::change::{Change, ChangeFeed};
use crate::constants::EVENTS_KEY;
use crate::error::{ScheduleError, ScheduleResult};
use crate::event::{Event, EventFields, ExportRow};
use crate::identity::UserId;
use crate::storage::{Storage, read_json};

pub struct EventStore {
    storage: Rc<dyn Storage>,
    owner: UserId,
    events: Vec<Event>,
    feed: ChangeFeed,
}

/// A pending deletion, shown to the user before it is confirmed.
#[derive(Debug, Clone)]
pub struct DeleteRequest {
    pub event: Event,
}

impl EventStore {
    pub fn load(storage: Rc<dyn Storage>, owner: UserId) -> Self {
        let events = read_all(storage.as_ref())
            .into_iter()
            .filter(|record| is_owned_by(record, &owner))
            .filter_map(|record| match serde_json::from_value::<Event>(record) {
                Ok(event) => Some(event),
                Err(e) => {
                    warn!(owner = %owner, "Skipping unreadable event record: {e}");
                    None
                }
            })
            .collect();

        EventStore {
            storage,
            owner,
            events,
            feed: ChangeFeed::new(),
        }
    }

    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    /// All of the owner's events, in the order they were added.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn get(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Events on `date`, earliest start first. Equal starts keep insertion order.
    pub fn query(&self, date: NaiveDate) -> Vec<&Event> {
        let mut day: Vec<&Event> = self.events.iter().filter(|e| e.date == date).collect();
        day.sort_by_key(|e| e.start_time);
        day
    }

    pub fn has_events(&self, date: NaiveDate) -> bool {
        self.events.iter().any(|e| e.date == date)
    }

    pub fn create(&mut self, date: NaiveDate, fields: EventFields) -> ScheduleResult<Event> {
        fields.validate()?;

        let event = Event {
            id: Uuid::new_v4().to_string(),
            owner_id: self.owner.clone(),
            date,
            name: fields.name,
            tag: fields.tag,
            start_time: fields.start_time,
            end_time: fields.end_time,
        };

        self.events.push(event.clone());

        if let Err(e) = self.save() {
            self.events.pop();
            return Err(e);
        }

        debug!(owner = %self.owner, id = %event.id, "Created event");
        self.feed.emit(Change::EventCreated(event.id.clone()));
        Ok(event)
    }

    /// Replace name, tag and times of an existing event.
    pub fn update(&mut self, id: &str, fields: EventFields) -> ScheduleResult<Event> {
        fields.validate()?;

        let index = self
            .events
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| ScheduleError::NotFound(id.to_string()))?;

        let previous = self.events[index].clone();
        self.events[index].apply(fields);

        if let Err(e) = self.save() {
            self.events[index] = previous;
            return Err(e);
        }

        debug!(owner = %self.owner, id, "Updated event");
        self.feed.emit(Change::EventUpdated(id.to_string()));
        Ok(self.events[index].clone())
    }

    /// Remove an event. Returns false (and writes nothing) if no such event exists.
    pub fn delete(&mut self, id: &str) -> ScheduleResult<bool> {
        let Some(index) = self.events.iter().position(|e| e.id == id) else {
            return Ok(false);
        };

        let removed = self.events.remove(index);

        if let Err(e) = self.save() {
            self.events.insert(index, removed);
            return Err(e);
        }

        debug!(owner = %self.owner, id, "Deleted event");
        self.feed.emit(Change::EventDeleted(id.to_string()));
        Ok(true)
    }

    /// First half of a confirmed delete: look the event up so it can be shown.
    pub fn delete_request(&self, id: &str) -> ScheduleResult<DeleteRequest> {
        self.get(id)
            .cloned()
            .map(|event| DeleteRequest { event })
            .ok_or_else(|| ScheduleError::NotFound(id.to_string()))
    }

    /// Second half of a confirmed delete.
    pub fn confirm_delete(&mut self, request: DeleteRequest) -> ScheduleResult<bool> {
        self.delete(&request.event.id)
    }

    /// Rows for the spreadsheet export, in natural order.
    pub fn export_rows(&self) -> Vec<ExportRow> {
        self.events.iter().map(Event::export_row).collect()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&Change) + 'static) {
        self.feed.subscribe(listener);
    }

    /// Read-merge-write: keep everyone else's records, replace the owner's.
    /// Nothing is written if the shared record cannot be read.
    fn save(&self) -> ScheduleResult<()> {
        let mut records: Vec<Value> = read_records(self.storage.as_ref())?
            .into_iter()
            .filter(|record| !is_owned_by(record, &self.owner))
            .collect();

        for event in &self.events {
            records.push(serde_json::to_value(event)?);
        }

        let content = serde_json::to_string(&records)?;
        self.storage.write(EVENTS_KEY, &content)
    }
}

/// The whole shared record. Missing reads as empty; unreadable is an error.
fn read_records(storage: &dyn Storage) -> ScheduleResult<Vec<Value>> {
    match read_json(storage, EVENTS_KEY)? {
        Some(Value::Array(records)) => Ok(records),
        Some(_) => Err(ScheduleError::Storage(
            "Events record is not an array".into(),
        )),
        None => Ok(Vec::new()),
    }
}

/// Like `read_records`, but an unreadable record loads as empty.
fn read_all(storage: &dyn Storage) -> Vec<Value> {
    read_records(storage).unwrap_or_else(|e| {
        warn!("Could not load events: {e}");
        Vec::new()
    })
}

fn is_owned_by(record: &Value, owner: &UserId) -> bool {
    record
        .get("ownerId")
        .or_else(|| record.get("userId"))
        .and_then(Value::as_str)
        .is_some_and(|id| id == owner.as_str())
}
