/// Storage key holding every user's events.
pub const EVENTS_KEY: &str = "scheduleEvents";

/// Storage key holding the per-user tag registries.
pub const TAGS_KEY: &str = "scheduleTags";

/// Storage key holding registered accounts.
pub const USERS_KEY: &str = "users";

/// Storage key pointing at the signed-in account.
pub const CURRENT_USER_KEY: &str = "currentUser";

/// Tags seeded for a user who has never saved a registry.
pub const DEFAULT_TAGS: [&str; 5] = ["Work", "Study", "Life", "Fitness", "Other"];

/// Cells in a month grid (6 weeks of 7 days).
pub const GRID_CELLS: usize = 42;

/// Days counted back from today for the "this week" statistic.
pub const WEEK_WINDOW_DAYS: i64 = 7;
