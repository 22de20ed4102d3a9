//! A signed-in user's working context.
//!
//! A `Session` owns the one event store, the one tag registry and the calendar
//! navigation state for a user. Front ends drive it by dispatching `Command`
//! messages and read it back through the grid/day/stats views.

use std::rc::Rc;

use chrono::NaiveDate;

use crate::change::Change;
use crate::config::ScheduleConfig;
use crate::error::{ScheduleError, ScheduleResult};
use crate::event::{Event, EventFields, ExportRow};
use crate::grid::{CalendarCell, CalendarView, YearMonth};
use crate::identity::{IdentityProvider, UserId};
use crate::stats::Stats;
use crate::storage::Storage;
use crate::store::{DeleteRequest, EventStore};
use crate::tags::TagRegistry;

/// A request from the UI layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Create an event on the selected date.
    CreateEvent(EventFields),
    UpdateEvent { id: String, fields: EventFields },
    /// Delete an event the user has already confirmed.
    DeleteEvent { id: String },
    AddTag(String),
    SelectDate(NaiveDate),
    ShowMonth(YearMonth),
    NextMonth,
    PrevMonth,
}

/// What a dispatched command did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Created(Event),
    Updated(Event),
    Deleted(String),
    TagAdded(String),
    /// Tag was blank or already present.
    TagUnchanged,
    Selected(NaiveDate),
    /// The date belongs to a neighbouring month and was not selected.
    SelectionRejected(NaiveDate),
    Showing(YearMonth),
}

pub struct Session {
    user: UserId,
    events: EventStore,
    tags: TagRegistry,
    view: CalendarView,
}

impl Session {
    pub fn open(
        identity: &dyn IdentityProvider,
        storage: Rc<dyn Storage>,
        config: &ScheduleConfig,
        today: NaiveDate,
    ) -> ScheduleResult<Self> {
        let user = identity
            .current_user_id()
            .ok_or(ScheduleError::NotSignedIn)?;

        Ok(Session {
            events: EventStore::load(Rc::clone(&storage), user.clone()),
            tags: TagRegistry::load(storage, user.clone(), &config.default_tags),
            view: CalendarView::new(today),
            user,
        })
    }

    pub fn user(&self) -> &UserId {
        &self.user
    }

    pub fn events(&self) -> &EventStore {
        &self.events
    }

    pub fn tags(&self) -> &TagRegistry {
        &self.tags
    }

    pub fn view(&self) -> &CalendarView {
        &self.view
    }

    pub fn dispatch(&mut self, command: Command) -> ScheduleResult<Outcome> {
        match command {
            Command::CreateEvent(fields) => {
                self.require_tag(&fields.tag)?;
                let date = self.view.selected();
                self.events.create(date, fields).map(Outcome::Created)
            }
            Command::UpdateEvent { id, fields } => {
                // Only a changed tag must be in the registry
                if self.events.get(&id).is_some_and(|e| e.tag != fields.tag) {
                    self.require_tag(&fields.tag)?;
                }
                self.events.update(&id, fields).map(Outcome::Updated)
            }
            Command::DeleteEvent { id } => {
                if self.events.delete(&id)? {
                    Ok(Outcome::Deleted(id))
                } else {
                    Err(ScheduleError::NotFound(id))
                }
            }
            Command::AddTag(name) => {
                if self.tags.add(&name)? {
                    Ok(Outcome::TagAdded(name.trim().to_string()))
                } else {
                    Ok(Outcome::TagUnchanged)
                }
            }
            Command::SelectDate(date) => {
                if self.view.select(date) {
                    Ok(Outcome::Selected(date))
                } else {
                    Ok(Outcome::SelectionRejected(date))
                }
            }
            Command::ShowMonth(month) => {
                self.view.show(month);
                Ok(Outcome::Showing(month))
            }
            Command::NextMonth => {
                self.view.next_month();
                Ok(Outcome::Showing(self.view.month()))
            }
            Command::PrevMonth => {
                self.view.prev_month();
                Ok(Outcome::Showing(self.view.month()))
            }
        }
    }

    /// Look up an event for the delete confirmation prompt.
    pub fn delete_request(&self, id: &str) -> ScheduleResult<DeleteRequest> {
        self.events.delete_request(id)
    }

    pub fn confirm_delete(&mut self, request: DeleteRequest) -> ScheduleResult<bool> {
        self.events.confirm_delete(request)
    }

    /// The month grid for the shown month.
    pub fn grid(&self, today: NaiveDate) -> Vec<CalendarCell> {
        self.view.grid(today, |date| self.events.has_events(date))
    }

    /// Events on the selected day, earliest first.
    pub fn day_events(&self) -> Vec<&Event> {
        self.events.query(self.view.selected())
    }

    pub fn stats(&self, today: NaiveDate) -> Stats {
        Stats::compute(self.events.events(), today)
    }

    pub fn export_rows(&self) -> Vec<ExportRow> {
        self.events.export_rows()
    }

    /// Subscribe to both event and tag changes.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&Change) + Clone + 'static,
    {
        self.events.subscribe(listener.clone());
        self.tags.subscribe(listener);
    }

    fn require_tag(&self, tag: &str) -> ScheduleResult<()> {
        if !self.tags.contains(tag) {
            return Err(ScheduleError::Validation(format!(
                "Unknown tag '{}'. Available: {}",
                tag,
                self.tags.tags().join(", ")
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::StaticIdentity;
    use crate::storage::MemoryStorage;
    use std::cell::RefCell;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fields(name: &str, tag: &str, start: &str, end: &str) -> EventFields {
        EventFields::parse(name, tag, start, end).unwrap()
    }

    fn open(storage: &Rc<MemoryStorage>, user: &str, today: NaiveDate) -> Session {
        Session::open(
            &StaticIdentity::signed_in(user),
            storage.clone(),
            &ScheduleConfig::default(),
            today,
        )
        .unwrap()
    }

    #[test]
    fn test_open_without_identity_fails() {
        let storage: Rc<dyn Storage> = Rc::new(MemoryStorage::new());
        let result = Session::open(
            &StaticIdentity::anonymous(),
            storage,
            &ScheduleConfig::default(),
            date(2024, 3, 10),
        );

        assert!(matches!(result, Err(ScheduleError::NotSignedIn)));
    }

    #[test]
    fn test_work_and_life_day() {
        let storage = Rc::new(MemoryStorage::new());
        let today = date(2024, 3, 10);
        let mut session = open(&storage, "+8613800001111", today);

        session
            .dispatch(Command::CreateEvent(fields("Life admin", "Life", "14:00", "15:00")))
            .unwrap();
        session
            .dispatch(Command::CreateEvent(fields("Deep work", "Work", "09:00", "10:30")))
            .unwrap();

        let day: Vec<&str> = session.day_events().iter().map(|e| e.tag.as_str()).collect();
        assert_eq!(day, vec!["Work", "Life"]);

        let stats = session.stats(today);
        assert_eq!(stats.total, 2);
        assert_eq!(stats.total_hours, 2.5);
        assert_eq!(stats.tag_distribution.get("Work"), Some(1));
        assert_eq!(stats.tag_distribution.get("Life"), Some(1));
        assert_eq!(stats.time_distribution.get("Work"), Some(1.5));
        assert_eq!(stats.time_distribution.get("Life"), Some(1.0));
    }

    #[test]
    fn test_create_uses_selected_date() {
        let storage = Rc::new(MemoryStorage::new());
        let mut session = open(&storage, "13800001111", date(2024, 3, 10));

        session.dispatch(Command::SelectDate(date(2024, 3, 21))).unwrap();
        let Outcome::Created(event) = session
            .dispatch(Command::CreateEvent(fields("Dentist", "Life", "10:00", "11:00")))
            .unwrap()
        else {
            panic!("expected Created");
        };

        assert_eq!(event.date, date(2024, 3, 21));
        let cell = session
            .grid(date(2024, 3, 10))
            .into_iter()
            .find(|c| c.date == date(2024, 3, 21))
            .unwrap();
        assert!(cell.has_events);
        assert!(cell.is_selected);
    }

    #[test]
    fn test_create_with_unknown_tag_is_rejected() {
        let storage = Rc::new(MemoryStorage::new());
        let mut session = open(&storage, "13800001111", date(2024, 3, 10));

        let result = session.dispatch(Command::CreateEvent(fields("Piano", "Music", "18:00", "19:00")));
        assert!(matches!(result, Err(ScheduleError::Validation(_))));
        assert!(session.events().events().is_empty());

        session.dispatch(Command::AddTag("Music".into())).unwrap();
        assert!(session
            .dispatch(Command::CreateEvent(fields("Piano", "Music", "18:00", "19:00")))
            .is_ok());
    }

    #[test]
    fn test_delete_missing_event_is_not_found() {
        let storage = Rc::new(MemoryStorage::new());
        let mut session = open(&storage, "13800001111", date(2024, 3, 10));
        session
            .dispatch(Command::CreateEvent(fields("A", "Work", "09:00", "10:00")))
            .unwrap();

        let result = session.dispatch(Command::DeleteEvent { id: "nope".into() });

        assert!(matches!(result, Err(ScheduleError::NotFound(_))));
        assert_eq!(session.events().events().len(), 1);
    }

    #[test]
    fn test_update_through_dispatch() {
        let storage = Rc::new(MemoryStorage::new());
        let mut session = open(&storage, "13800001111", date(2024, 3, 10));
        let Outcome::Created(created) = session
            .dispatch(Command::CreateEvent(fields("A", "Work", "09:00", "10:00")))
            .unwrap()
        else {
            panic!("expected Created");
        };

        let outcome = session
            .dispatch(Command::UpdateEvent {
                id: created.id.clone(),
                fields: fields("A", "Study", "09:00", "11:00"),
            })
            .unwrap();

        let Outcome::Updated(updated) = outcome else {
            panic!("expected Updated");
        };
        assert_eq!(updated.tag, "Study");
        assert_eq!(updated.duration_hours(), 2.0);
    }

    #[test]
    fn test_tags_are_shared_by_add_and_edit_paths() {
        let storage = Rc::new(MemoryStorage::new());
        let mut session = open(&storage, "13800001111", date(2024, 3, 10));
        let Outcome::Created(created) = session
            .dispatch(Command::CreateEvent(fields("A", "Work", "09:00", "10:00")))
            .unwrap()
        else {
            panic!("expected Created");
        };

        assert_eq!(
            session.dispatch(Command::AddTag(" Reading ".into())).unwrap(),
            Outcome::TagAdded("Reading".into())
        );
        assert_eq!(
            session.dispatch(Command::AddTag("Reading".into())).unwrap(),
            Outcome::TagUnchanged
        );

        // The edit path sees the tag added from the create path
        session
            .dispatch(Command::UpdateEvent {
                id: created.id,
                fields: fields("A", "Reading", "09:00", "10:00"),
            })
            .unwrap();
    }

    #[test]
    fn test_selection_outside_shown_month_is_rejected() {
        let storage = Rc::new(MemoryStorage::new());
        let mut session = open(&storage, "13800001111", date(2024, 3, 10));

        assert_eq!(
            session.dispatch(Command::SelectDate(date(2024, 4, 1))).unwrap(),
            Outcome::SelectionRejected(date(2024, 4, 1))
        );

        session.dispatch(Command::NextMonth).unwrap();
        assert_eq!(
            session.dispatch(Command::SelectDate(date(2024, 4, 1))).unwrap(),
            Outcome::Selected(date(2024, 4, 1))
        );
        assert_eq!(
            session.dispatch(Command::PrevMonth).unwrap(),
            Outcome::Showing(YearMonth::new(2024, 3).unwrap())
        );
    }

    #[test]
    fn test_users_share_storage_without_clobbering() {
        let storage = Rc::new(MemoryStorage::new());
        let today = date(2024, 3, 10);

        let mut alice = open(&storage, "13800001111", today);
        let mut bob = open(&storage, "13900002222", today);

        let mut alice_ids = Vec::new();
        for (name, start) in [("A1", "09:00"), ("A2", "11:00")] {
            if let Outcome::Created(e) = alice
                .dispatch(Command::CreateEvent(fields(name, "Work", start, "12:00")))
                .unwrap()
            {
                alice_ids.push(e.id);
            }
        }
        bob.dispatch(Command::CreateEvent(fields("B1", "Life", "10:00", "11:00")))
            .unwrap();
        bob.dispatch(Command::AddTag("Gym".into())).unwrap();
        alice.dispatch(Command::AddTag("Music".into())).unwrap();

        for id in alice_ids {
            alice.dispatch(Command::DeleteEvent { id }).unwrap();
        }

        let bob = open(&storage, "13900002222", today);
        let names: Vec<&str> = bob.day_events().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["B1"]);
        assert!(bob.tags().contains("Gym"));
        assert!(!bob.tags().contains("Music"));
        assert!(open(&storage, "13800001111", today).day_events().is_empty());
    }

    #[test]
    fn test_subscribers_see_event_and_tag_changes() {
        let storage = Rc::new(MemoryStorage::new());
        let mut session = open(&storage, "13800001111", date(2024, 3, 10));
        let seen = Rc::new(RefCell::new(Vec::new()));
        {
            let seen = Rc::clone(&seen);
            session.subscribe(move |change: &Change| seen.borrow_mut().push(change.clone()));
        }

        session.dispatch(Command::AddTag("Music".into())).unwrap();
        session
            .dispatch(Command::CreateEvent(fields("Piano", "Music", "18:00", "19:00")))
            .unwrap();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], Change::TagsChanged);
        assert!(matches!(seen[1], Change::EventCreated(_)));
    }

    #[test]
    fn test_event_keeps_a_tag_that_left_the_registry() {
        let storage = Rc::new(MemoryStorage::new());
        let today = date(2024, 3, 10);
        let mut session = open(&storage, "13800001111", today);
        let Outcome::Created(created) = session
            .dispatch(Command::CreateEvent(fields("Report", "Work", "09:00", "10:00")))
            .unwrap()
        else {
            panic!("expected Created");
        };

        let config = ScheduleConfig {
            default_tags: vec!["Life".to_string()],
            ..ScheduleConfig::default()
        };
        let mut session = Session::open(
            &StaticIdentity::signed_in("13800001111"),
            storage.clone(),
            &config,
            today,
        )
        .unwrap();
        assert!(!session.tags().contains("Work"));

        let outcome = session
            .dispatch(Command::UpdateEvent {
                id: created.id.clone(),
                fields: fields("Quarterly report", "Work", "09:00", "10:00"),
            })
            .unwrap();
        assert!(matches!(outcome, Outcome::Updated(ref e) if e.name == "Quarterly report"));

        let result = session.dispatch(Command::UpdateEvent {
            id: created.id.clone(),
            fields: fields("Quarterly report", "Study", "09:00", "10:00"),
        });
        assert!(matches!(result, Err(ScheduleError::Validation(_))));

        let result = session.dispatch(Command::UpdateEvent {
            id: "missing".into(),
            fields: fields("X", "Study", "09:00", "10:00"),
        });
        assert!(matches!(result, Err(ScheduleError::NotFound(_))));
    }
}
