//! The active player profile for one play session.
//!
//! A [`ProfileSession`] loads the named profile (or starts a fresh one), routes
//! experience grants through [`grant_experience`] so level-ups reach the event
//! bus, and writes the profile back to disk when the session ends.

use std::path::PathBuf;

use tracing::{error, info};
use turntable_core::error::Result;
use turntable_core::{LevelCurve, LevelUp, Profile, ProfileStore, TurntableConfig};

use crate::console::CommandContext;
use crate::engine::{Console, EventBus, GameEvent};

/// Grant `amount` experience to `profile` and fire one `LevelUp` event if any
/// level was gained.
pub fn grant_experience(
    profile: &mut Profile,
    amount: u64,
    curve: &LevelCurve,
    events: &mut dyn EventBus,
) -> Option<LevelUp> {
    let level_up = profile.add_experience(amount, curve)?;
    info!(%level_up, experience = profile.experience, "Level up");
    events.fire(GameEvent::LevelUp(level_up));
    Some(level_up)
}

/// Owns the active profile between load and shutdown.
#[derive(Debug)]
pub struct ProfileSession {
    name: String,
    profile: Profile,
    curve: LevelCurve,
    level_table_max: u32,
    store: ProfileStore,
    save_on_shutdown: bool,
    closed: bool,
}

impl ProfileSession {
    /// Open `name` (or the configured default profile).
    ///
    /// Fires `ProfileCreated` when nothing was saved under that name.
    ///
    /// # Errors
    /// Returns an error if the store cannot be resolved or the saved profile
    /// is unreadable.
    pub fn open(
        config: &TurntableConfig,
        name: Option<&str>,
        events: &mut dyn EventBus,
    ) -> Result<Self> {
        let store = ProfileStore::from_config(&config.persistence)?;
        let name = name.unwrap_or(&config.persistence.default_profile);
        let mut session = Self::open_in(store, name, config.progression.curve, events)?;
        session.level_table_max = config.progression.level_table_max;
        session.save_on_shutdown = config.persistence.save_on_shutdown;
        Ok(session)
    }

    /// Open `name` in an explicit store.
    ///
    /// # Errors
    /// Returns an error if the saved profile is unreadable or `name` is invalid.
    pub fn open_in(
        store: ProfileStore,
        name: &str,
        curve: LevelCurve,
        events: &mut dyn EventBus,
    ) -> Result<Self> {
        let profile = match store.load(name)? {
            Some(profile) => profile,
            None => {
                info!(profile = name, "Starting a fresh profile");
                events.fire(GameEvent::ProfileCreated {
                    name: name.to_string(),
                });
                Profile::new()
            }
        };

        Ok(Self {
            name: name.to_string(),
            profile,
            curve,
            level_table_max: 99,
            store,
            save_on_shutdown: true,
            closed: false,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    #[must_use]
    pub fn curve(&self) -> &LevelCurve {
        &self.curve
    }

    /// Grant experience to the active profile.
    pub fn add_experience(&mut self, amount: u64, events: &mut dyn EventBus) -> Option<LevelUp> {
        grant_experience(&mut self.profile, amount, &self.curve, events)
    }

    /// Borrow the session as the context console commands run against.
    pub fn command_context<'a>(
        &'a mut self,
        console: &'a mut dyn Console,
        events: &'a mut dyn EventBus,
    ) -> CommandContext<'a> {
        CommandContext {
            profile: &mut self.profile,
            curve: &self.curve,
            level_table_max: self.level_table_max,
            console,
            events,
        }
    }

    /// Write the profile to disk now.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn save(&self) -> Result<PathBuf> {
        self.store.save(&self.name, &self.profile)
    }

    /// End the session, saving if configured to, and report any failure.
    ///
    /// # Errors
    /// Returns an error if the final save fails.
    pub fn close(mut self) -> Result<()> {
        self.closed = true;
        if self.save_on_shutdown {
            self.save()?;
        }
        Ok(())
    }
}

impl Drop for ProfileSession {
    fn drop(&mut self) {
        if self.closed || !self.save_on_shutdown {
            return;
        }
        if let Err(e) = self.save() {
            error!(profile = %self.name, error = %e, "Failed to save profile on shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EventLog;

    fn temp_store() -> (tempfile::TempDir, ProfileStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ProfileStore::new(dir.path().join("UserProfiles"));
        (dir, store)
    }

    #[test]
    fn missing_profile_starts_fresh_and_announces_it() {
        let (_dir, store) = temp_store();
        let mut events = EventLog::new();
        let session =
            ProfileSession::open_in(store, "Default", LevelCurve::default(), &mut events)
                .expect("open");
        assert_eq!(*session.profile(), Profile::new());
        assert_eq!(events.count("ProfileCreated"), 1);
    }

    #[test]
    fn multi_level_grant_fires_one_event() {
        let (_dir, store) = temp_store();
        let mut events = EventLog::new();
        let mut session =
            ProfileSession::open_in(store, "Default", LevelCurve::default(), &mut events)
                .expect("open");

        let level_up = session.add_experience(900, &mut events).expect("level up");
        assert_eq!(level_up.levels_gained(), 3);
        assert_eq!(events.count("LevelUp"), 1);
        assert_eq!(events.events.last(), Some(&GameEvent::LevelUp(level_up)));

        assert!(session.add_experience(1, &mut events).is_none());
        assert_eq!(events.count("LevelUp"), 1);
    }

    #[test]
    fn drop_saves_profile() {
        let (_dir, store) = temp_store();
        let mut events = EventLog::new();
        {
            let mut session = ProfileSession::open_in(
                store.clone(),
                "Default",
                LevelCurve::default(),
                &mut events,
            )
            .expect("open");
            session.add_experience(150, &mut events);
        }
        let saved = store.load("Default").expect("load").expect("saved on drop");
        assert_eq!(saved, Profile::from_parts(150, 2, 1));
    }

    #[test]
    fn close_saves_and_reopen_restores() {
        let (_dir, store) = temp_store();
        let mut events = EventLog::new();
        let mut session =
            ProfileSession::open_in(store.clone(), "Alice", LevelCurve::default(), &mut events)
                .expect("open");
        session.add_experience(400, &mut events);
        session.close().expect("close");

        let mut events = EventLog::new();
        let reopened =
            ProfileSession::open_in(store, "Alice", LevelCurve::default(), &mut events)
                .expect("reopen");
        assert_eq!(reopened.profile().level, 3);
        assert_eq!(events.count("ProfileCreated"), 0);
    }

    #[test]
    fn open_uses_configured_default_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = TurntableConfig::default();
        config.persistence.data_dir = Some(dir.path().to_path_buf());
        config.persistence.default_profile = "Guest".to_string();
        config.persistence.save_on_shutdown = false;

        let mut events = EventLog::new();
        let session = ProfileSession::open(&config, None, &mut events).expect("open");
        assert_eq!(session.name(), "Guest");
        drop(session);

        // save_on_shutdown = false leaves nothing behind.
        let store = ProfileStore::from_config(&config.persistence).expect("store");
        assert!(!store.exists("Guest").expect("exists"));
    }

    #[test]
    fn invalid_name_is_rejected() {
        let (_dir, store) = temp_store();
        let mut events = EventLog::new();
        assert!(
            ProfileSession::open_in(store, "../x", LevelCurve::default(), &mut events).is_err()
        );
    }
}
